use super::form::ReportDraft;

/// Key/value pairs for the submission body, in wire order: `name`, `date`,
/// then `activity[]`/`sub_activity[]`/`task[]` grouped per row, with `token`
/// and `sid` appended last. Row fields repeat the same bracketed key so the
/// receiver can zip the three lists back into rows.
pub fn submission_pairs(draft: &ReportDraft, token: &str, sid: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(4 + draft.rows.len() * 3);
    pairs.push(("name".to_string(), draft.name.clone()));
    pairs.push(("date".to_string(), draft.date.format("%Y-%m-%d").to_string()));
    for row in &draft.rows {
        pairs.push(("activity[]".to_string(), row.activity.clone()));
        pairs.push(("sub_activity[]".to_string(), row.sub_activity.clone()));
        pairs.push(("task[]".to_string(), row.task.clone()));
    }
    pairs.push(("token".to_string(), token.to_string()));
    pairs.push(("sid".to_string(), sid.to_string()));
    pairs
}

/// Percent-encode the pairs into an `application/x-www-form-urlencoded` body.
pub fn encode_form(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| {
            format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
        })
        .collect::<Vec<_>>()
        .join("&")
}
