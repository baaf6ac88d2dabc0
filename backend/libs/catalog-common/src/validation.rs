use validator::ValidationErrors;

/// Wire name of a Rust field, `book_id` -> `bookId`
fn wire_name(field: &str) -> String {
    let mut name = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            name.extend(c.to_uppercase());
            upper = false;
        } else {
            name.push(c);
        }
    }
    name
}

/// `field: message; ` pairs sorted by field, with fields under their
/// camelCase wire names. Errors without a message fall back to their code.
pub fn describe_validation(errors: &ValidationErrors) -> String {
    let mut pairs: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = wire_name(field);
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                (field.clone(), message)
            })
        })
        .collect();
    pairs.sort();

    pairs
        .into_iter()
        .map(|(field, message)| format!("{}: {}; ", field, message))
        .collect()
}
