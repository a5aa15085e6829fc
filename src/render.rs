//! Plain text rendering of response bodies

use crate::client::{Response, Scheme};


const ENTITIES: [(&'static str, char); 5] = [
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&amp;", '&'),
    ("&quot;", '"'),
    ("&apos;", '\''),
];

/// Text to show for the response
///
/// `view-source` bodies are returned as is, everything else has markup
/// stripped and entities decoded.
pub fn render(response: &Response) -> String {
    match response.scheme {
        Scheme::ViewSource => response.body.clone(),
        _ => decode_entities(&strip_tags(&response.body)),
    }
}

/// Removes everything between `<` and the next `>`, inclusive
///
/// Tags don't nest and an unterminated tag swallows the rest of the text.
pub fn strip_tags(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    result
}

/// Decodes the five predefined XML entities
///
/// Decoded text is never rescanned, so `&amp;lt;` becomes `&lt;`. Unknown
/// entities are left untouched.
pub fn decode_entities(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        result.push_str(&rest[..amp]);
        rest = &rest[amp..];
        match ENTITIES.iter().find(|&&(name, _)| rest.starts_with(name)) {
            Some(&(name, c)) => {
                result.push(c);
                rest = &rest[name.len()..];
            }
            None => {
                result.push('&');
                rest = &rest[1..];
            }
        }
    }
    result.push_str(rest);
    result
}

#[cfg(test)]
mod test {
    use super::{decode_entities, render, strip_tags};
    use crate::client::{Response, Scheme};
    use crate::shared::HeaderMap;

    fn response(scheme: Scheme, body: &str) -> Response {
        Response::synthesized(scheme, HeaderMap::new(), body.to_string())
    }

    #[test]
    fn test_strip() {
        assert_eq!(strip_tags("a <b>bold</b> c"), "a bold c");
        assert_eq!(strip_tags("<html><body>hi</body></html>"), "hi");
        assert_eq!(strip_tags("1 > 0"), "1 > 0");
        assert_eq!(strip_tags("open <tag never ends"), "open ");
    }

    #[test]
    fn test_entities() {
        assert_eq!(decode_entities("&lt;tag&gt;"), "<tag>");
        assert_eq!(decode_entities("&quot;q&quot; &apos;a&apos;"),
                   "\"q\" 'a'");
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
        assert_eq!(decode_entities("fish &amp chips &nbsp;"),
                   "fish &amp chips &nbsp;");
        assert_eq!(decode_entities("trailing &"), "trailing &");
    }

    #[test]
    fn test_render() {
        let resp = response(Scheme::Https, "<p>1 &lt; 2</p>");
        assert_eq!(render(&resp), "1 < 2");
        // entities are decoded after tags are gone
        let resp = response(Scheme::Data, "&lt;b&gt;x");
        assert_eq!(render(&resp), "<b>x");
    }

    #[test]
    fn test_view_source_verbatim() {
        let resp = response(Scheme::ViewSource, "<p>1 &lt; 2</p>");
        assert_eq!(render(&resp), "<p>1 &lt; 2</p>");
    }
}
