//! 登录认证模块
//!
//! 凭据校验、会话存储接口和登录控制器

pub mod controller;
pub mod crypt;
pub mod session;

pub use controller::{AuthController, LoginOutcome, LoginRequirement, SessionKeys};
pub use crypt::{CredentialVerifier, Crypt};
pub use session::{MemorySessionStore, SessionStore};
