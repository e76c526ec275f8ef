use emend::{CandidateSummary, SanitizeReport};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_run(grammar: &str, report: &SanitizeReport, color: bool) {
    let palette = ansi::Palette::new(color);
    println!(
        "\n{}",
        palette.bold(palette.paint(format!("⚙  Sanitizing: \"{}\" ({} grammar)", report.text, grammar), ansi::CYAN))
    );
    if report.details.truncated {
        println!(
            "   {}",
            palette.dim(format!(
                "input clipped to {} characters: \"{}\"",
                report.details.matched_text.chars().count(),
                report.details.matched_text
            ))
        );
    }

    // Engine summary
    println!("\n{}", palette.paint("━━━ Candidates ━━━", ansi::GRAY));
    print_candidates(report, &palette);

    // Results
    println!("\n{}", palette.paint("━━━ Results ━━━", ansi::GRAY));
    if report.results.is_empty() {
        println!("{}", palette.dim("  No conforming rewrite produced"));
        println!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
        println!("  • No suggestion function covers the failing position");
        println!("  • A length bound filtered every candidate");
        println!("  • The input stops where the grammar still requires more");
        println!("\n{}", palette.dim("  Tip: Set EMEND_DEBUG_RULES=1 to see match traces"));
    } else {
        print_results(report, &palette);
    }

    // Timing
    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!(
        "  Total: {}  │  Matching: {}  │  Ranking: {}",
        palette.paint(format!("{:?}", report.details.total), ansi::GREEN),
        palette.paint(format!("{:?}", report.details.matching), ansi::CYAN),
        palette.dim(format!("{:?}", report.details.ranking)),
    );
    println!();
}

fn print_candidates(report: &SanitizeReport, palette: &ansi::Palette) {
    let details = &report.details;
    println!(
        "  {} {}  {} {}  {} {}",
        palette.dim("raw:"),
        palette.paint(details.raw_candidates.to_string(), ansi::BLUE),
        palette.dim("full:"),
        palette.paint(details.full_matches.to_string(), ansi::BLUE),
        palette.dim("unique:"),
        palette.paint(details.unique_results.to_string(), ansi::BLUE),
    );
    println!(
        "  {} {}  {} {}  {} {}",
        palette.dim("nodes:"),
        palette.paint(details.nodes_visited.to_string(), ansi::YELLOW),
        palette.dim("suggestions:"),
        palette.paint(details.suggestions_invoked.to_string(), ansi::YELLOW),
        palette.dim("cycle cuts:"),
        palette.paint(details.cycles_cut.to_string(), ansi::YELLOW),
    );
    for sample in details.samples.iter().take(5) {
        println!("    {}", fmt_candidate_compact(sample, palette));
    }
    if details.raw_candidates > 5 {
        println!("    {}", palette.dim(format!("... +{} more", details.raw_candidates - 5)));
    }
}

fn print_results(report: &SanitizeReport, palette: &ansi::Palette) {
    for (idx, result) in report.results.iter().enumerate() {
        println!(
            "  {} {} {} {}",
            palette.paint(format!("[{}]", idx), ansi::GRAY),
            palette.bold(palette.paint(result, ansi::GREEN)),
            palette.dim("│"),
            palette.paint(format!("{} chars", result.chars().count()), ansi::YELLOW),
        );
    }
}

fn fmt_candidate_compact(sample: &CandidateSummary, palette: &ansi::Palette) -> String {
    let mark = if sample.complete { palette.paint("✓", ansi::GREEN) } else { palette.dim("✗") };
    format!(
        "{} {} {}",
        mark,
        palette.paint(format!("\"{}\"", sample.consumed), ansi::BLUE),
        palette.dim(format!("rest {}", sample.rest_chars)),
    )
}
