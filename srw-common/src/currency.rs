//! Rupiah formatting and JPY to IDR conversion

use std::fmt::Display;

/// JPY to IDR exchange rate applied to paid-live totals
pub const DEFAULT_JPY_TO_IDR: f64 = 10.4;

/// Format an amount as Rupiah text: `Rp 1.000.000`
///
/// Every run of digits is grouped by three from the right with `.`; any
/// other characters pass through untouched, so `"12833.60"` becomes
/// `Rp 12.833.60`. A missing amount formats as `Rp 0`.
pub fn convert_rupiah<T: Display>(value: Option<T>) -> String {
    let text = match value {
        Some(v) => v.to_string(),
        None => "0".to_string(),
    };
    format!("Rp {}", group_digit_runs(&text))
}

/// Insert `.` every three digits, counted from the right of each digit run
pub fn group_digit_runs(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 3);
    let mut run = String::new();

    for ch in text.chars() {
        if ch.is_ascii_digit() {
            run.push(ch);
        } else {
            flush_run(&mut run, &mut out);
            out.push(ch);
        }
    }
    flush_run(&mut run, &mut out);
    out
}

fn flush_run(run: &mut String, out: &mut String) {
    let len = run.len();
    for (i, ch) in run.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    run.clear();
}

/// Text amount of IDR for a JPY total
///
/// With `legacy_trailing_zero` the shortest decimal form of `total_jpy * rate`
/// gets a literal `"0"` appended, multiplying integral results by ten. The
/// public figures have always been computed that way, so it stays the default.
pub fn idr_amount_text(total_jpy: i64, rate: f64, legacy_trailing_zero: bool) -> String {
    let idr = total_jpy as f64 * rate;
    if legacy_trailing_zero {
        format!("{}0", idr)
    } else {
        format!("{}", idr)
    }
}

/// `totalIDR` field value for a JPY total
pub fn format_idr_total(total_jpy: i64, rate: f64, legacy_trailing_zero: bool) -> String {
    convert_rupiah(Some(idr_amount_text(total_jpy, rate, legacy_trailing_zero)))
}
