/// 整理 AI 返回的文本用于展示
///
/// 统一换行符，去掉行尾空白，把连续空行压成一行，并去除首尾空白。
/// 纯函数，任何输入都返回尽力整理后的结果，不会失败。
pub fn format(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");

    let mut cleaned = String::with_capacity(unified.len());
    let mut previous_blank = false;

    for line in unified.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            if previous_blank {
                continue;
            }
            previous_blank = true;
        } else {
            previous_blank = false;
        }
        cleaned.push_str(line);
        cleaned.push('\n');
    }

    cleaned.trim().to_string()
}
