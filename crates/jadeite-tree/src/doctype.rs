/// Doctype shorthands and the declarations they expand to.
pub static DOCTYPES: [(&str, &str); 9] = [
    ("5", "<!DOCTYPE html>"),
    ("default", "<!DOCTYPE html>"),
    ("xml", r#"<?xml version="1.0" encoding="utf-8" ?>"#),
    (
        "transitional",
        r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">"#,
    ),
    (
        "strict",
        r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd">"#,
    ),
    (
        "frameset",
        r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Frameset//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-frameset.dtd">"#,
    ),
    (
        "1.1",
        r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.1//EN" "http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd">"#,
    ),
    (
        "basic",
        r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML Basic 1.1//EN" "http://www.w3.org/TR/xhtml-basic/xhtml-basic11.dtd">"#,
    ),
    (
        "mobile",
        r#"<!DOCTYPE html PUBLIC "-//WAPFORUM//DTD XHTML Mobile 1.2//EN" "http://www.openmobilealliance.org/tech/DTD/xhtml-mobile12.dtd">"#,
    ),
];

pub fn lookup(name: &str) -> Option<&'static str> {
    DOCTYPES.iter().find(|(key, _)| *key == name).map(|&(_, declaration)| declaration)
}

pub(crate) fn render_into(name: &str, out: &mut String) {
    match lookup(name) {
        Some(declaration) => out.push_str(declaration),
        None => {
            out.push_str("<!DOCTYPE ");
            out.push_str(name);
            out.push_str(" >");
        }
    }
}
