//! Pure string escaping for embedding text in the installer page.
//!
//! File contents end up inside a JavaScript template literal (backtick
//! delimited) that itself lives in an HTML `<script>` element, so two
//! layers need protecting:
//!
//! - [`escape`]: keeps the template literal intact (no early `` ` ``, no live
//!   `${...}` interpolation, no stray escape sequences)
//! - [`guard_script_markup`]: keeps the HTML tokenizer in plain script data,
//!   so only the page's own `</script>` ends the element
//! - [`encode_carriage_returns`]: keeps CR and CRLF line endings, which a
//!   template literal would otherwise normalize to LF
//!
//! [`escape_html`] is for text placed directly in markup, such as the page
//! title. [`unescape`] is the inverse of [`escape`] as seen by a JS engine.

use memchr::{memchr_iter, memchr3_iter};

/// Escape text for embedding inside a backtick-delimited template literal.
///
/// Rules, in precedence order:
/// 1. `` ` `` becomes `` \` ``
/// 2. `\` becomes `\\` (only backslashes from the input, never the ones
///    inserted by rule 1)
/// 3. `${` becomes `\${`
/// 4. leading and trailing whitespace is trimmed
///
/// All rules are applied in a single left-to-right pass, so no rule ever
/// sees the output of another.
///
/// # Examples
///
/// ```
/// use airlift::escape::escape;
///
/// assert_eq!(escape("`back${tick}\\slash`"), "\\`back\\${tick}\\\\slash\\`");
/// assert_eq!(escape("  plain  "), "plain");
/// ```
pub fn escape(content: &str) -> String {
    let bytes = content.as_bytes();
    let mut result = String::with_capacity(content.len() + content.len() / 16);
    let mut last = 0;

    // All three needles are ASCII, so every match is a char boundary.
    for pos in memchr3_iter(b'`', b'\\', b'$', bytes) {
        match bytes[pos] {
            b'`' => {
                result.push_str(&content[last..pos]);
                result.push_str("\\`");
                last = pos + 1;
            }
            b'\\' => {
                result.push_str(&content[last..pos]);
                result.push_str("\\\\");
                last = pos + 1;
            }
            b'$' if bytes.get(pos + 1) == Some(&b'{') => {
                result.push_str(&content[last..pos]);
                result.push('\\');
                // The `$` itself is copied with the next chunk.
                last = pos;
            }
            _ => {}
        }
    }
    result.push_str(&content[last..]);

    // Every escape is a backslash followed by a non-whitespace char, so
    // trimming can never split one.
    let trimmed = result.trim();
    if trimmed.len() == result.len() {
        result
    } else {
        trimmed.to_string()
    }
}

/// Cook the body of a template literal the way a JavaScript engine would.
///
/// Raw CR and CRLF line endings become LF. `\r`, `\n` and `\xHH` escapes
/// are decoded, a backslash before a line break is a line continuation, and
/// any other `\c` yields `c`. That covers every sequence [`escape`],
/// [`encode_carriage_returns`] and [`guard_script_markup`] can produce. A
/// trailing lone backslash is kept as is.
///
/// # Examples
///
/// ```
/// use airlift::escape::{escape, unescape};
///
/// let original = "let s = `${name}\\n`;";
/// assert_eq!(unescape(&escape(original)), original);
/// assert_eq!(unescape("a\r\nb\\rc"), "a\nb\rc");
/// ```
pub fn unescape(body: &str) -> String {
    let mut result = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('r') => result.push('\r'),
                Some('n') => result.push('\n'),
                Some('x') => {
                    let hex: String = chars.by_ref().take(2).collect();
                    let decoded = (hex.len() == 2 && hex.chars().all(|h| h.is_ascii_hexdigit()))
                        .then(|| u32::from_str_radix(&hex, 16).ok())
                        .flatten()
                        .and_then(char::from_u32);
                    match decoded {
                        Some(decoded) => result.push(decoded),
                        None => {
                            result.push('x');
                            result.push_str(&hex);
                        }
                    }
                }
                Some('\n') => {}
                Some('\r') => {
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                }
                Some(next) => result.push(next),
                None => result.push('\\'),
            },
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                result.push('\n');
            }
            _ => result.push(c),
        }
    }

    result
}

/// Replace every raw carriage return with the `\r` escape sequence.
///
/// Template literals (and the HTML parser before them) turn CR and CRLF into
/// LF, so a raw CR would not survive the trip. Run on [`escape`] output,
/// where every backslash is already paired.
///
/// # Examples
///
/// ```
/// use airlift::escape::{encode_carriage_returns, unescape};
///
/// assert_eq!(encode_carriage_returns("a\r\nb"), "a\\r\nb");
/// assert_eq!(unescape(&encode_carriage_returns("a\r\nb")), "a\r\nb");
/// ```
pub fn encode_carriage_returns(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace('\r', "\\r")
}

/// Rewrite every `<` that starts `<!--`, `<script` or `</script` (any case)
/// as the escape `\x3C`.
///
/// A `</script` would end the element early, and `<!--` followed by
/// `<script` switches the tokenizer into its double-escaped state where the
/// page's own `</script>` no longer closes anything. `\x3C` cooks back to
/// `<` in both template literals and string literals, so the recovered text
/// is unchanged.
///
/// # Examples
///
/// ```
/// use airlift::escape::guard_script_markup;
///
/// assert_eq!(guard_script_markup("a</SCRIPT>b"), "a\\x3C/SCRIPT>b");
/// assert_eq!(guard_script_markup("<!-- x -->"), "\\x3C!-- x -->");
/// assert_eq!(guard_script_markup("a < b"), "a < b");
/// ```
pub fn guard_script_markup(text: &str) -> String {
    const GUARDED: [&[u8]; 3] = [b"!--", b"script", b"/script"];

    let bytes = text.as_bytes();
    let mut result = String::with_capacity(text.len());
    let mut last = 0;

    for pos in memchr_iter(b'<', bytes) {
        let tail = &bytes[pos + 1..];
        let guarded = GUARDED
            .iter()
            .any(|g| tail.len() >= g.len() && tail[..g.len()].eq_ignore_ascii_case(g));
        if guarded {
            result.push_str(&text[last..pos]);
            result.push_str("\\x3C");
            last = pos + 1;
        }
    }
    result.push_str(&text[last..]);

    result
}

/// Escape text for use in HTML character data or attribute values.
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}
