use rand::Rng;

/// `"{AA}-{BB}-{NNN}"`: the first two letters of the start and end names,
/// upper-cased, and a random number in 100..=999. Purely decorative; two
/// shipments can share an ID.
pub fn generate_tracking_id(start: &str, end: &str) -> String {
    let suffix: u16 = rand::rng().random_range(100..=999);
    format_tracking_id(start, end, suffix)
}

pub fn format_tracking_id(start: &str, end: &str, suffix: u16) -> String {
    format!("{}-{}-{}", prefix(start), prefix(end), suffix)
}

fn prefix(name: &str) -> String {
    name.trim().chars().take(2).collect::<String>().to_uppercase()
}

pub fn normalize_tracking_id(input: &str) -> String {
    input.trim().to_uppercase()
}
