//! 多语言消息模块
//!
//! 使用rat_embed_lang框架提供错误消息与登录提示的多语言支持

use std::collections::HashMap;
use std::sync::Once;

use rat_embed_lang::register_translations;

static INIT: Once = Once::new();

/// 消息翻译注册器
pub struct ErrorMessageI18n;

/// 插入一条三语翻译
fn insert_entry(
    translations: &mut HashMap<String, HashMap<String, String>>,
    key: &str,
    zh: &str,
    en: &str,
    ja: &str,
) {
    let mut entry = HashMap::new();
    entry.insert("zh-CN".to_string(), zh.to_string());
    entry.insert("en-US".to_string(), en.to_string());
    entry.insert("ja-JP".to_string(), ja.to_string());
    translations.insert(key.to_string(), entry);
}

impl ErrorMessageI18n {
    /// 注册所有消息翻译
    pub fn register_all_translations() {
        let mut translations = HashMap::new();

        // 字段访问错误
        insert_entry(
            &mut translations,
            "error.field_access",
            "字段访问失败: {entity}.{field} - {message}",
            "Field access failed: {entity}.{field} - {message}",
            "フィールドアクセスに失敗しました: {entity}.{field} - {message}",
        );

        // 字段数量错误
        insert_entry(
            &mut translations,
            "error.arity",
            "字段数量不匹配: {entity} 需要 {expected} 个值，实际收到 {actual} 个",
            "Field count mismatch: {entity} expects {expected} values, got {actual}",
            "フィールド数が一致しません: {entity} は {expected} 個の値が必要ですが {actual} 個を受け取りました",
        );

        // 无效ID
        insert_entry(
            &mut translations,
            "error.invalid_id",
            "无效的记录ID: {entity} id={id}",
            "Invalid record id: {entity} id={id}",
            "無効なレコードID: {entity} id={id}",
        );

        // 记录不存在
        insert_entry(
            &mut translations,
            "error.record_not_found",
            "记录不存在: 表 {table} 条件 {key}",
            "Record not found: table {table} key {key}",
            "レコードが見つかりません: テーブル {table} 条件 {key}",
        );

        // 记录不唯一
        insert_entry(
            &mut translations,
            "error.ambiguous_record",
            "记录查询结果不唯一: 表 {table} 条件 {key} 命中 {found} 行",
            "Ambiguous record: table {table} key {key} matched {found} rows",
            "レコードが一意ではありません: テーブル {table} 条件 {key} が {found} 行に一致しました",
        );

        // 存储错误
        insert_entry(
            &mut translations,
            "error.storage",
            "存储操作失败: {message}",
            "Storage operation failed: {message}",
            "ストレージ操作が失敗しました: {message}",
        );

        // 实体描述符错误
        insert_entry(
            &mut translations,
            "error.descriptor",
            "实体描述符无效: {entity} - {message}",
            "Invalid entity descriptor: {entity} - {message}",
            "エンティティ記述子が無効です: {entity} - {message}",
        );

        // 验证错误
        insert_entry(
            &mut translations,
            "error.validation",
            "数据验证失败: {field} - {message}",
            "Validation failed: {field} - {message}",
            "検証が失敗しました: {field} - {message}",
        );

        // 配置错误
        insert_entry(
            &mut translations,
            "error.config",
            "配置错误: {message}",
            "Configuration error: {message}",
            "設定エラー: {message}",
        );

        // 序列化错误
        insert_entry(
            &mut translations,
            "error.serialization",
            "数据序列化失败: {message}",
            "Data serialization failed: {message}",
            "データシリアライズが失敗しました: {message}",
        );

        // IO错误
        insert_entry(
            &mut translations,
            "error.io",
            "IO错误: {message}",
            "IO error: {message}",
            "IOエラー: {message}",
        );

        // SQLite连接失败
        insert_entry(
            &mut translations,
            "error.sqlite_connection",
            "SQLite连接失败: {message}",
            "SQLite connection failed: {message}",
            "SQLite接続に失敗しました: {message}",
        );

        // SQLite数据库文件不存在
        insert_entry(
            &mut translations,
            "error.sqlite_file_not_found",
            "SQLite数据库文件不存在且未启用自动创建: {path}",
            "SQLite database file does not exist and create_if_missing is disabled: {path}",
            "SQLiteデータベースファイルが存在せず、自動作成も無効です: {path}",
        );

        // SQLite目录创建失败
        insert_entry(
            &mut translations,
            "error.sqlite_dir_create",
            "创建SQLite数据库目录失败: {message}",
            "Failed to create SQLite database directory: {message}",
            "SQLiteデータベースディレクトリの作成に失敗しました: {message}",
        );

        // 登录失败：账户不存在
        insert_entry(
            &mut translations,
            "auth.unknown_identifier",
            "您输入的邮箱尚未在 {app} 注册，非常抱歉。",
            "The email you entered is not registered with {app}. Terribly sorry.",
            "入力されたメールアドレスは {app} に登録されていません。申し訳ありません。",
        );

        // 登录失败：密码错误
        insert_entry(
            &mut translations,
            "auth.wrong_secret",
            "哎呀，您的密码不正确。",
            "Uh-oh. Your password is incorrect.",
            "パスワードが正しくありません。",
        );

        // 会话载入
        insert_entry(
            &mut translations,
            "auth.session_loaded",
            "已载入会话: {name}",
            "Session loaded for: {name}",
            "セッションを読み込みました: {name}",
        );

        register_translations(translations);
    }

    /// 初始化多语言系统
    ///
    /// 可以重复调用，只有第一次调用会注册翻译并按环境变量选择语言
    pub fn init() {
        INIT.call_once(|| {
            Self::register_all_translations();

            // 从环境变量获取语言设置，默认为zh-CN
            let lang = std::env::var("RAT_LANG")
                .or_else(|_| std::env::var("LANG"))
                .unwrap_or_else(|_| "zh-CN".to_string());

            use rat_embed_lang::normalize_language_code;
            let normalized_lang = normalize_language_code(&lang);
            set_language(&normalized_lang);
        });
    }
}

/// 重新导出rat_embed_lang的核心函数
pub use rat_embed_lang::{t, tf, set_language, current_language};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_repeatable() {
        ErrorMessageI18n::init();
        ErrorMessageI18n::init();
        crate::init();

        let message = t("auth.wrong_secret");
        assert!(
            [
                "哎呀，您的密码不正确。",
                "Uh-oh. Your password is incorrect.",
                "パスワードが正しくありません。",
            ]
            .contains(&message.as_str()),
            "未找到已注册的翻译: {}",
            message
        );
    }
}
