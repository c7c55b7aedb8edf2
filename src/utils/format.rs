//! String template utilities

/// Fill a template by substituting values into `{}` placeholders in order.
///
/// Extra placeholders beyond the supplied values are kept verbatim; extra
/// values beyond the placeholders are ignored.
pub fn fill_template(template: &str, values: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    for value in values {
        match rest.find("{}") {
            Some(pos) => {
                out.push_str(&rest[..pos]);
                out.push_str(value);
                rest = &rest[pos + 2..];
            }
            None => break,
        }
    }

    out.push_str(rest);
    out
}
