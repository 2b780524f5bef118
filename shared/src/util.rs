/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random (4096 values per ms)
///
/// UNIQUE/PRIMARY KEY constraints remain the safety net against collisions.
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    (ts << 12) | rand_bits
}

/// Lowercase ASCII slug: alphanumerics kept, every other run collapsed to `-`.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Uppercase alphanumeric token used inside SKUs (`"Navy Blue"` -> `"NAVYBLUE"`).
pub fn sku_token(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// SKU prefix: first six name characters plus the last four of an id.
///
/// `sku_prefix("Classic Tee", "prod_8c31f2")` -> `"CLASSI31F2"`
pub fn sku_prefix(name: &str, id: &str) -> String {
    let name: String = sku_token(name).chars().take(6).collect();
    let id = sku_token(id);
    let tail = &id[id.len().saturating_sub(4)..];
    let name = if name.is_empty() { "SKU".to_string() } else { name };
    format!("{name}{tail}")
}

/// Synthesize a variant SKU as `PREFIX-SIZE-COLOR`.
pub fn synthesize_sku(prefix: &str, size: &str, color: &str) -> String {
    format!("{}-{}-{}", sku_token(prefix), sku_token(size), sku_token(color))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snowflake_is_positive_and_time_ordered() {
        let a = snowflake_id();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = snowflake_id();
        assert!(a > 0);
        assert!(b >> 12 > a >> 12);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Ravi's  Tee Shop!"), "ravi-s-tee-shop");
        assert_eq!(slugify("--Already-Slugged--"), "already-slugged");
        assert_eq!(slugify("  "), "");
    }

    #[test]
    fn test_synthesize_sku() {
        assert_eq!(synthesize_sku("tee-01", "XL", "Navy Blue"), "TEE01-XL-NAVYBLUE");
        assert_eq!(sku_token("m/l"), "ML");
    }

    #[test]
    fn test_sku_prefix() {
        assert_eq!(sku_prefix("Classic Tee", "prod_8c31f2"), "CLASSI31F2");
        assert_eq!(sku_prefix("Mug", "7"), "MUG7");
        assert_eq!(sku_prefix("", "abc"), "SKUABC");
    }
}
