//! Prompt templates for the review roles.
//!
//! Every template demands a bare-JSON response in the `ReviewResult` shape
//! so the extraction step stays trivial. Line numbers in the code payload
//! are real new-file numbers; the model is told to echo them back.

use crate::role::ReviewRole;

const RESPONSE_CONTRACT: &str = r#"Respond with ONLY valid JSON. No markdown, no explanation, no extra text.

Required format:
{"findings":[{"severity":"CRITICAL|HIGH|MEDIUM|LOW","category":"bug|security|performance|style|quality","line":1,"description":"issue","fix":"solution"}],"summary":"one line"}

Each line number must be taken from the numbered prefix of the code."#;

/// Build the full prompt for a role over one file's numbered added code.
///
/// `chunk_note` annotates split reviews of large files ("chunk 2/5"), empty
/// otherwise.
pub fn build_prompt(role: ReviewRole, code: &str, filename: &str, chunk_note: &str) -> String {
    let note = if chunk_note.is_empty() {
        String::new()
    } else {
        format!(" ({})", chunk_note)
    };

    match role {
        ReviewRole::General => format!(
            r#"Review this code from file '{filename}'{note} for bugs, security, performance, and style.

```
{code}
```

{contract}

Example:
{{"findings":[{{"severity":"HIGH","category":"bug","line":3,"description":"division by zero when the list is empty","fix":"return early on empty input"}}],"summary":"1 bug found"}}"#,
            filename = filename,
            note = note,
            code = code,
            contract = RESPONSE_CONTRACT,
        ),
        ReviewRole::Security => format!(
            r#"You are a SECURITY EXPERT. Review this code from file '{filename}'{note} for security vulnerabilities ONLY.

Focus on these security issues:
- SQL Injection (string concatenation in queries)
- Command Injection (shelling out with user input)
- XSS (Cross-Site Scripting)
- Hardcoded secrets (passwords, API keys, tokens)
- Insecure deserialization
- Path traversal (user input in file paths)
- SSRF (Server-Side Request Forgery)
- Weak cryptography (MD5, SHA1 for passwords)
- Missing authentication/authorization checks
- Sensitive data exposure in logs

IGNORE: code style, naming conventions, minor bugs, performance.

```
{code}
```

If no security issues are found, return: {{"findings":[],"summary":"No security issues found"}}

{contract}"#,
            filename = filename,
            note = note,
            code = code,
            contract = RESPONSE_CONTRACT,
        ),
        ReviewRole::Quality => format!(
            r#"You are a CODE QUALITY EXPERT. Review this code from file '{filename}'{note} for quality and maintainability ONLY.

Focus on these quality issues:
- Function too long or complex
- Poor naming (unclear variable/function names)
- Code duplication
- Missing or inadequate error handling
- Tight coupling / poor separation of concerns
- Magic numbers/strings (should be constants)
- Inconsistent code style
- Dead code or unused variables
- Poor API design

IGNORE: security vulnerabilities, performance optimizations.

```
{code}
```

If no quality issues are found, return: {{"findings":[],"summary":"Code quality looks good"}}

{contract}"#,
            filename = filename,
            note = note,
            code = code,
            contract = RESPONSE_CONTRACT,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_embed_code_and_filename() {
        for role in ReviewRole::ALL {
            let prompt = build_prompt(role, "   1| let x = 1;", "src/lib.rs", "");
            assert!(prompt.contains("   1| let x = 1;"));
            assert!(prompt.contains("src/lib.rs"));
            assert!(prompt.contains("Respond with ONLY valid JSON"));
        }
    }

    #[test]
    fn test_chunk_note_is_included_when_present() {
        let prompt = build_prompt(ReviewRole::General, "code", "a.rs", "chunk 2/3");
        assert!(prompt.contains("(chunk 2/3)"));

        let prompt = build_prompt(ReviewRole::General, "code", "a.rs", "");
        assert!(!prompt.contains("()"));
    }

    #[test]
    fn test_roles_have_distinct_focus() {
        let sec = build_prompt(ReviewRole::Security, "c", "f", "");
        let qual = build_prompt(ReviewRole::Quality, "c", "f", "");
        assert!(sec.contains("SECURITY EXPERT"));
        assert!(qual.contains("CODE QUALITY EXPERT"));
        assert!(sec.contains("IGNORE: code style"));
        assert!(qual.contains("IGNORE: security vulnerabilities"));
    }
}
