use std::fmt::Write as FmtWrite;

use crate::engine::DisplayFrame;
use crate::region::CountryTable;

/// `1234567` → `"1,234,567"`.
pub fn format_population(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Short form for narrow layouts: `1.4B`, `376.0M`, `12.3K`, `999`.
pub fn format_compact(value: u64) -> String {
    let v = value as f64;
    if value >= 1_000_000_000 {
        format!("{:.1}B", v / 1e9)
    } else if value >= 1_000_000 {
        format!("{:.1}M", v / 1e6)
    } else if value >= 1_000 {
        format!("{:.1}K", v / 1e3)
    } else {
        value.to_string()
    }
}

/// Render a frame as text bars, `width` characters for the widest bar.
pub fn render_frame(frame: &DisplayFrame, table: &CountryTable, width: usize) -> String {
    let mut s = String::new();
    let Some(year) = frame.year else {
        return s;
    };

    let axis = frame
        .axis_ticks()
        .iter()
        .map(|t| format_compact(*t))
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(s, "── {year} ── 0  {axis}").unwrap();

    let name_width = frame.rows.iter().map(|r| r.country.len()).max().unwrap_or(0);
    for (i, row) in frame.rows.iter().enumerate() {
        let bar_len = (frame.bar_fraction(i) * width as f64).round() as usize;
        writeln!(
            s,
            "{:>2}. [{}] {:<name_width$} {:<width$} {} ({})",
            row.rank,
            table.flag_code(&row.country).unwrap_or("--"),
            row.country,
            "█".repeat(bar_len.max(1)),
            format_population(row.displayed),
            row.region,
        )
        .unwrap();
    }
    writeln!(s, "Total: {}", format_population(frame.total())).unwrap();
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FrameRow;
    use crate::region::Region;

    #[test]
    fn full_form_groups_thousands() {
        assert_eq!(format_population(0), "0");
        assert_eq!(format_population(999), "999");
        assert_eq!(format_population(1000), "1,000");
        assert_eq!(format_population(554_000_000), "554,000,000");
        assert_eq!(format_population(1_412_360_000), "1,412,360,000");
    }

    #[test]
    fn compact_form_uses_suffixes() {
        assert_eq!(format_compact(999), "999");
        assert_eq!(format_compact(12_345), "12.3K");
        assert_eq!(format_compact(376_000_000), "376.0M");
        assert_eq!(format_compact(1_425_000_000), "1.4B");
    }

    #[test]
    fn renders_rows_and_total() {
        let frame = DisplayFrame {
            year: Some(1950),
            rows: vec![
                FrameRow {
                    rank: 1,
                    country: "China".into(),
                    region: Region::Asia,
                    population: 554_000_000,
                    displayed: 554_000_000,
                },
                FrameRow {
                    rank: 2,
                    country: "India".into(),
                    region: Region::Asia,
                    population: 376_000_000,
                    displayed: 376_000_000,
                },
            ],
        };
        let text = render_frame(&frame, CountryTable::builtin(), 20);
        assert!(text.starts_with("── 1950 ──"));
        assert!(text.contains(" 1. [cn] China"));
        assert!(text.contains("554,000,000 (Asia)"));
        assert!(text.contains("Total: 930,000,000"));
    }

    #[test]
    fn idle_frame_renders_nothing() {
        assert!(render_frame(&DisplayFrame::default(), CountryTable::builtin(), 20).is_empty());
    }
}
