//! 账户实体
//!
//! 登录流程使用的用户与团队记录

pub mod team;
pub mod user;

pub use team::Team;
pub use user::{User, EMAIL_FIELD, SESSION_TOKEN_FIELD};
