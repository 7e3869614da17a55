//! Answer post-processing

use regex::Regex;
use std::sync::OnceLock;

/// Remove filesystem-path artifacts a model sometimes copies out of staged
/// context, e.g. "(C:\Users\me\AppData\Local\Temp\upload.pdf)" or
/// "(/tmp/studio-rag-staging-1234/file.docx)"
pub fn strip_path_artifacts(answer: &str) -> String {
    static PATH_ARTIFACT: OnceLock<Regex> = OnceLock::new();
    let re = PATH_ARTIFACT.get_or_init(|| {
        Regex::new(r"\(\s*(?:[A-Za-z]:\\|/(?:tmp|var|private|home|Users)/)[^)]*\)")
            .expect("static regex")
    });

    let stripped = re.replace_all(answer, "");

    // Collapse doubled spaces left behind by the removal
    static DOUBLE_SPACE: OnceLock<Regex> = OnceLock::new();
    let spaces = DOUBLE_SPACE.get_or_init(|| Regex::new(r" {2,}").expect("static regex"));
    spaces.replace_all(stripped.trim(), " ").to_string()
}
