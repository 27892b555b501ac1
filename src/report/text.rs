use crate::pipeline::stage4_rank::RankedRow;
use crate::report::{SummaryData, format_f64_2, format_opt_2, title_case};

const NO_DATA: &str = "No data available for this position.";

pub fn prompt_text() -> &'static str {
    "Please enter a job position (e.g. Data Analyst) to begin the analysis.\n"
}

pub fn no_match_text(query: &str) -> String {
    format!("Position '{}' not found in the dataset.\n", title_case(query))
}

pub fn render_report_text(data: &SummaryData) -> String {
    let title = format!("Talent Match Report: {}", data.position_title);
    let mut out = String::new();
    out.push_str(&title);
    out.push('\n');
    out.push_str(&"=".repeat(title.chars().count()));
    out.push_str("\n\n");

    out.push_str(&format!(
        "Found {} employees with position {}\n",
        data.n_employees, data.position_title
    ));
    for advisory in &data.advisories {
        out.push_str(&format!("Warning: {}\n", advisory.message()));
    }
    out.push('\n');

    let mut section = 0usize;
    let mut heading = |out: &mut String, name: &str| {
        section += 1;
        out.push_str(&format!("{section}. {name}\n"));
    };

    heading(&mut out, "Final match rate distribution");
    if data.histogram.is_empty() {
        out.push_str(NO_DATA);
        out.push('\n');
    } else {
        for bin in &data.histogram {
            out.push_str(&format!(
                "  {:>7} - {:<7} {}\n",
                format_f64_2(bin.lower),
                format_f64_2(bin.upper),
                bin.count
            ));
        }
    }
    out.push('\n');

    if let Some(groups) = &data.by_grade {
        heading(&mut out, "Match rate by grade");
        if groups.is_empty() {
            out.push_str(NO_DATA);
            out.push('\n');
        }
        for g in groups {
            match &g.box_stats {
                Some(b) => out.push_str(&format!(
                    "  {}: n={}, mean={}, min={}, q1={}, median={}, q3={}, max={}\n",
                    g.group,
                    g.n_rows,
                    format_opt_2(g.summary.mean),
                    format_f64_2(b.min),
                    format_f64_2(b.q1),
                    format_f64_2(b.median),
                    format_f64_2(b.q3),
                    format_f64_2(b.max)
                )),
                None => out.push_str(&format!("  {}: n={}, no scores\n", g.group, g.n_rows)),
            }
        }
        out.push('\n');
    }

    heading(&mut out, &format!("Top {} performers", data.top.len()));
    out.push_str(&ranked_table(&data.top));
    out.push('\n');

    heading(&mut out, &format!("Bottom {} performers", data.bottom.len()));
    out.push_str(&ranked_table(&data.bottom));
    out.push('\n');

    if !data.tgv_profile.is_empty() {
        heading(&mut out, "Average TGV profile");
        for c in &data.tgv_profile {
            out.push_str(&format!("  {}: {}\n", c.column, format_opt_2(c.mean)));
        }
        out.push('\n');
    }

    heading(&mut out, "Summary insights");
    let ins = &data.insights;
    out.push_str(&format!(
        "Average Match Rate: {}%\n",
        format_opt_2(ins.average_match_rate)
    ));
    out.push_str(&format!(
        "Standard Deviation: {}\n",
        format_opt_2(ins.stddev_match_rate)
    ));
    if let (Some(best), Some(worst)) = (&ins.best, &ins.worst) {
        out.push_str(&format!(
            "Top Performer: {} ({}%)\n",
            best.name.as_deref().unwrap_or("n/a"),
            format_opt_2(best.final_match_rate)
        ));
        out.push_str(&format!(
            "Lowest Performer: {} ({}%)\n",
            worst.name.as_deref().unwrap_or("n/a"),
            format_opt_2(worst.final_match_rate)
        ));
    }

    out
}

fn ranked_table(rows: &[RankedRow]) -> String {
    if rows.is_empty() {
        return format!("{NO_DATA}\n");
    }
    let headers = ["Name", "Avg TV Gap", "Avg TGV", "Final Match Rate (%)"];
    let cells: Vec<[String; 4]> = rows
        .iter()
        .map(|r| {
            [
                r.name.clone().unwrap_or_default(),
                format_opt_2(r.gap_tv),
                format_opt_2(r.tgv_avg),
                format_opt_2(r.final_match_rate),
            ]
        })
        .collect();

    let mut widths = headers.map(|h| h.chars().count());
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let push_row = |out: &mut String, row: [&str; 4]| {
        out.push_str(&format!(
            "  {:<w0$}  {:>w1$}  {:>w2$}  {:>w3$}\n",
            row[0],
            row[1],
            row[2],
            row[3],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
            w3 = widths[3]
        ));
    };
    push_row(&mut out, headers);
    for row in &cells {
        push_row(&mut out, [row[0].as_str(), row[1].as_str(), row[2].as_str(), row[3].as_str()]);
    }
    out
}
