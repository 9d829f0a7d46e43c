// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库,支持中文（默认）和英文
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 支持的语言
pub const SUPPORTED_LOCALES: [&str; 2] = ["zh-CN", "en"];

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 按配置设置语言; 不支持的语言保持当前设置
///
/// # 返回
/// 是否已切换
pub fn apply_locale(locale: &str) -> bool {
    let locale = locale.trim();
    match SUPPORTED_LOCALES
        .iter()
        .find(|supported| supported.eq_ignore_ascii_case(locale))
    {
        Some(supported) => {
            set_locale(supported);
            true
        }
        None => {
            tracing::warn!(locale, "不支持的语言，保持当前设置");
            false
        }
    }
}

/// 翻译消息（无参数）
///
/// ```no_run
/// use teaching_plan::i18n::t;
/// let msg = t("common.success");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数,占位符写作 `%{name}`）
///
/// ```no_run
/// use teaching_plan::i18n::t_with_args;
/// let msg = t_with_args("plan.overflow", &[("count", "3")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // locale 为全局状态,相关测试串行执行
    static LOCALE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_apply_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        assert!(apply_locale(" EN "));
        assert_eq!(current_locale(), "en");

        assert!(!apply_locale("fr"));
        assert_eq!(current_locale(), "en");

        set_locale("zh-CN");
    }

    #[test]
    fn test_translate_simple() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("zh-CN");
        assert_eq!(t("common.success"), "操作成功");

        set_locale("en");
        assert_eq!(t("common.success"), "Operation successful");

        set_locale("zh-CN");
    }

    #[test]
    fn test_translate_with_args() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("zh-CN");
        let msg = t_with_args("plan.overflow", &[("count", "2")]);
        assert!(msg.contains('2'));
        assert!(msg.contains("自学"));

        set_locale("en");
        let msg = t_with_args(
            "plan.empty_budget",
            &[("subject", "STQA"), ("start", "2026-01-01"), ("end", "2026-01-03")],
        );
        assert!(msg.contains("STQA"));
        assert!(msg.contains("2026-01-03"));
        assert!(!msg.contains("%{"));

        set_locale("zh-CN");
    }
}
