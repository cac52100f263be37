//! 路径归一化。
//!
//! 调用方路径可能混用两种分隔符并带盘符前缀，这里统一转换成
//! 根相对的规范形式。归一化本身不产生错误，无意义的输入会在
//! 后续解析阶段因为不存在而失败。

/// 将调用方提供的路径归一化为根相对的规范形式。
///
/// 反斜杠转正斜杠，大小写不敏感地去掉盘符前缀，去掉全部前导
/// 斜杠。根目录本身归一化为空串。对任意输入满足幂等：
/// `normalize(normalize(p)) == normalize(p)`。
pub fn normalize(raw: &str) -> String {
    let slashed = raw.replace('\\', "/");
    let mut rest = slashed.trim_start();
    loop {
        let bytes = rest.as_bytes();
        if bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'/'
        {
            rest = rest[2..].trim_start_matches('/');
        } else if bytes.first() == Some(&b'/') {
            rest = rest.trim_start_matches('/');
        } else {
            return rest.to_string();
        }
    }
}

/// 转换为内部绝对路径形式：反斜杠转正斜杠，盘符小写。
///
/// `C:\path\to\home` -> `c:/path/to/home`
pub fn to_internal_absolute(path: &str) -> String {
    let slashed = path.replace('\\', "/");
    let bytes = slashed.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_uppercase() && bytes[1] == b':' {
        let mut lowered = String::with_capacity(slashed.len());
        lowered.push(bytes[0].to_ascii_lowercase() as char);
        lowered.push_str(&slashed[1..]);
        lowered
    } else {
        slashed
    }
}

/// 内部绝对路径：可选的小写盘符前缀后跟一个斜杠。
pub fn is_internal_absolute(path: &str) -> bool {
    let bytes = path.as_bytes();
    let rest = if bytes.len() >= 2 && bytes[0].is_ascii_lowercase() && bytes[1] == b':' {
        &path[2..]
    } else {
        path
    };
    rest.starts_with('/')
}

/// 规范路径的最后一段（文件名）。根目录返回空串。
pub fn basename(canonical: &str) -> &str {
    canonical.rsplit('/').next().unwrap_or_default()
}

/// 规范路径转为带前导斜杠的逻辑路径。根目录为 `/`。
pub fn to_logical(canonical: &str) -> String {
    format!("/{canonical}")
}

/// 在逻辑目录路径下拼接条目名。
pub fn join_logical(dir: &str, name: &str) -> String {
    if dir.ends_with('/') {
        format!("{dir}{name}")
    } else {
        format!("{dir}/{name}")
    }
}

/// `mv` 目的地推断：返回（目的目录, 目的文件名）。
///
/// - `to` 以 `/` 结尾或为空：文件名取 `from` 的最后一段；
/// - `to` 含 `/`：在最后一个斜杠处切分，目录保留尾斜杠；
/// - 其余情况整个 `to` 视为根目录下的文件名。
pub fn split_destination(from: &str, to: &str) -> (String, String) {
    if to.is_empty() || to.ends_with('/') {
        return (to.to_string(), basename(from).to_string());
    }
    match to.rfind('/') {
        Some(index) => (to[..=index].to_string(), to[index + 1..].to_string()),
        None => (String::new(), to.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_separators_and_prefixes() {
        assert_eq!(normalize("/path/to/file"), "path/to/file");
        assert_eq!(normalize("path/to/file"), "path/to/file");
        assert_eq!(normalize("\\path\\to\\file"), "path/to/file");
        assert_eq!(normalize("C:\\path\\to\\file"), "path/to/file");
        assert_eq!(normalize("c:/path"), "path");
        assert_eq!(normalize("  /spaced"), "spaced");
    }

    #[test]
    fn test_normalize_root_and_degenerate_input() {
        assert_eq!(normalize("/"), "");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("//server/share"), "server/share");
        // 没有后随斜杠的盘符不算前缀
        assert_eq!(normalize("c:file"), "c:file");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            "/path/to/file",
            "C:\\Users\\u\\doc.txt",
            "c:/c:/x",
            "//a//b",
            "relative/path",
            "",
            "/",
            "  C:/mixed\\slashes",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_to_internal_absolute() {
        assert_eq!(to_internal_absolute("C:\\path\\to\\home"), "c:/path/to/home");
        assert_eq!(to_internal_absolute("/home/u"), "/home/u");
        assert_eq!(to_internal_absolute("z:/already"), "z:/already");
    }

    #[test]
    fn test_is_internal_absolute() {
        assert!(is_internal_absolute("/home/u"));
        assert!(is_internal_absolute("c:/home/u"));
        assert!(!is_internal_absolute("home/u"));
        assert!(!is_internal_absolute("c:home"));
        assert!(!is_internal_absolute(""));
    }

    #[test]
    fn test_split_destination_with_explicit_basename() {
        assert_eq!(
            split_destination("x/y.txt", "x/z/w.txt"),
            ("x/z/".to_string(), "w.txt".to_string())
        );
    }

    #[test]
    fn test_split_destination_infers_from_source() {
        assert_eq!(
            split_destination("x/y.txt", "x/z/"),
            ("x/z/".to_string(), "y.txt".to_string())
        );
        assert_eq!(
            split_destination("x/y.txt", ""),
            ("".to_string(), "y.txt".to_string())
        );
    }

    #[test]
    fn test_split_destination_bare_name_targets_root() {
        assert_eq!(
            split_destination("x/y.txt", "z.txt"),
            ("".to_string(), "z.txt".to_string())
        );
    }

    #[test]
    fn test_logical_helpers() {
        assert_eq!(to_logical("a/b"), "/a/b");
        assert_eq!(to_logical(""), "/");
        assert_eq!(join_logical("/a/b", "c"), "/a/b/c");
        assert_eq!(join_logical("/", "c"), "/c");
        assert_eq!(basename("a/b/c.txt"), "c.txt");
        assert_eq!(basename(""), "");
    }
}
