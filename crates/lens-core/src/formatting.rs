/// Format a per-capita rate with exactly four decimal places.
///
/// # Examples
///
/// ```
/// use lens_core::formatting::format_rate;
///
/// assert_eq!(format_rate(0.12), "0.1200");
/// assert_eq!(format_rate(0.0583), "0.0583");
/// assert_eq!(format_rate(1.0), "1.0000");
/// ```
pub fn format_rate(rate: f64) -> String {
    format!("{:.4}", rate)
}

/// Format a collection of ZIP codes as a bracketed, comma-separated list.
///
/// # Examples
///
/// ```
/// use lens_core::formatting::format_zip_set;
///
/// assert_eq!(format_zip_set(["19103", "19104"]), "[19103, 19104]");
/// assert_eq!(format_zip_set(Vec::<String>::new()), "[]");
/// ```
pub fn format_zip_set<I>(zips: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut out = String::from("[");
    for (i, zip) in zips.into_iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(zip.as_ref());
    }
    out.push(']');
    out
}

// ── Tests ──────────────────────────────────────────────────────────────────────
