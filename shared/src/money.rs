use std::fmt::Write;

/// Base units per coin.
pub const COIN: i64 = 100_000_000;

/// Format a base-unit amount as coins, e.g. `150000000` -> `"1.50"`.
///
/// Trailing fraction zeros are trimmed but at least two fraction digits remain.
pub fn format_money(amount: i64) -> String {
    let mut out = String::with_capacity(20);
    write_money(&mut out, amount);
    out
}

pub fn write_money(buf: &mut String, amount: i64) {
    buf.clear();
    let abs = amount.unsigned_abs();
    let coin = COIN as u64;
    if amount < 0 {
        buf.push('-');
    }
    let _ = write!(buf, "{}.{:08}", abs / coin, abs % coin);

    let frac_start = buf.len() - 8;
    let keep = buf[frac_start..].trim_end_matches('0').len().max(2);
    buf.truncate(frac_start + keep);
}
