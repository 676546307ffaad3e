//! Phone number normalization for SMS and WhatsApp recipients.
//!
//! Guests enter numbers in whatever shape the invitation card suggested,
//! so raw input arrives as local numbers ("501234567"), numbers with a
//! leading zero ("0501234567"), or full international form. Providers
//! are stricter: some want `+` E.164, some want bare digits with the
//! country code.

/// Normalizes a raw phone number into `+` E.164 form.
///
/// Nine-digit input is treated as a local mobile number and prefixed
/// with the default country code. A leading zero is replaced by the
/// country code. Everything else is assumed to already carry one.
pub fn normalize_plus_e164(raw: &str, country_code: &str) -> String {
    let digits = digits_of(raw);
    if digits.len() == 9 {
        format!("+{}{}", country_code, digits)
    } else if let Some(rest) = digits.strip_prefix('0') {
        format!("+{}{}", country_code, rest)
    } else {
        format!("+{}", digits)
    }
}

/// Normalizes a raw phone number into bare MSISDN digits, as expected
/// by providers that reject a `+` prefix.
pub fn normalize_msisdn(raw: &str, country_code: &str) -> String {
    let digits = digits_of(raw);
    if digits.len() == 9 {
        format!("{}{}", country_code, digits)
    } else if let Some(rest) = digits.strip_prefix('0') {
        format!("{}{}", country_code, rest)
    } else {
        digits
    }
}

fn digits_of(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_mobile_gets_country_code() {
        assert_eq!(normalize_plus_e164("501234567", "971"), "+971501234567");
    }

    #[test]
    fn full_international_number_is_kept() {
        assert_eq!(normalize_plus_e164("971501234567", "971"), "+971501234567");
    }

    #[test]
    fn leading_zero_is_replaced_by_country_code() {
        assert_eq!(normalize_plus_e164("0501234567", "971"), "+971501234567");
    }

    #[test]
    fn plus_and_separators_are_stripped() {
        assert_eq!(
            normalize_plus_e164("+971 50-123-4567", "971"),
            "+971501234567"
        );
    }

    #[test]
    fn foreign_international_number_passes_through() {
        assert_eq!(normalize_plus_e164("+14155552671", "971"), "+14155552671");
    }

    #[test]
    fn msisdn_strips_plus_prefix() {
        assert_eq!(normalize_msisdn("+971501234567", "971"), "971501234567");
    }

    #[test]
    fn msisdn_expands_local_number() {
        assert_eq!(normalize_msisdn("501234567", "971"), "971501234567");
    }

    #[test]
    fn msisdn_replaces_leading_zero() {
        assert_eq!(normalize_msisdn("0501234567", "971"), "971501234567");
    }
}
