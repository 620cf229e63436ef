use url::Url;

/// 한 줄 텍스트 정리: 태그 제거, 공백/개행 압축, 앞뒤 공백 제거
pub fn sanitize_text_field(input: &str) -> String {
    let stripped = strip_tags(input);
    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// 여러 줄 텍스트 정리: 태그 제거, 줄바꿈은 유지
pub fn sanitize_textarea_field(input: &str) -> String {
    let stripped = strip_tags(input);
    stripped
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// URL 정리: http/https 절대 URL만 허용, 그 외는 빈 문자열
pub fn sanitize_url(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    match Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            // Url은 path가 비면 "/"를 붙이므로 입력 형태를 유지
            if url.path() == "/" && !trimmed.ends_with('/') {
                trimmed.to_string()
            } else {
                url.to_string()
            }
        }
        _ => String::new(),
    }
}

/// 음이 아닌 정수로 변환 (숫자가 아니면 0). 빈 입력은 빈 문자열 유지
pub fn sanitize_absint(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let unsigned = trimmed.strip_prefix('-').unwrap_or(trimmed);
    let digits: String = unsigned.chars().take_while(|c| c.is_ascii_digit()).collect();
    match digits.trim_start_matches('0') {
        "" => "0".to_string(),
        n => n.to_string(),
    }
}

fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;

    for c in input.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if in_tag => {}
            '\n' => out.push(c),
            _ if c.is_control() => out.push(' '),
            _ => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_text_field() {
        assert_eq!(sanitize_text_field("  Robbie <b>Hogan</b>\n\t "), "Robbie Hogan");
        assert_eq!(sanitize_text_field("<script>x</script>ok"), "xok");
    }

    #[test]
    fn test_sanitize_textarea_keeps_lines() {
        assert_eq!(
            sanitize_textarea_field("  first   line\nsecond <i>line</i>  "),
            "first line\nsecond line"
        );
    }

    #[test]
    fn test_sanitize_url() {
        assert_eq!(sanitize_url(" https://abc.supabase.co "), "https://abc.supabase.co");
        assert_eq!(sanitize_url("https://abc.supabase.co/"), "https://abc.supabase.co/");
        assert_eq!(sanitize_url("javascript:alert(1)"), "");
        assert_eq!(sanitize_url("not a url"), "");
    }

    #[test]
    fn test_sanitize_absint() {
        assert_eq!(sanitize_absint("587"), "587");
        assert_eq!(sanitize_absint("-25"), "25");
        assert_eq!(sanitize_absint("abc"), "0");
        assert_eq!(sanitize_absint("0465"), "465");
        assert_eq!(sanitize_absint(""), "");
    }
}
