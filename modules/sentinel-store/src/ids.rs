use chrono::Utc;
use rand::Rng;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Short, roughly time-ordered id: base36 epoch millis + 6 random base36 chars.
pub fn generate_id() -> String {
    let mut id = to_base36(Utc::now().timestamp_millis().max(0) as u64);
    let mut rng = rand::rng();
    for _ in 0..6 {
        id.push(BASE36[rng.random_range(0..BASE36.len())] as char);
    }
    id
}

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}
