use clinval::{CandidateSummary, ExtractionRequest, ExtractionVerbose, Value};

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

pub fn print_run(input: &str, request: &ExtractionRequest, res: &ExtractionVerbose, color: bool) {
    let palette = ansi::Palette::new(color);
    let details = &res.details;

    println!("\n{}", palette.bold(palette.paint(format!("⚙  Extracting: \"{}\"", input.trim()), ansi::CYAN)));
    println!(
        "  {} {}  {} [{}, {}]",
        palette.dim("terms:"),
        palette.paint(request.terms.join(", "), ansi::BLUE),
        palette.dim("│ bounds:"),
        request.min_value,
        request.max_value,
    );

    // Templates
    println!("\n{}", palette.paint("━━━ Templates ━━━", ansi::GRAY));
    if details.active_templates.is_empty() {
        println!("{}", palette.dim("  No templates active (input has no digits?)"));
    } else {
        println!("  {}", palette.paint(details.active_templates.join(" → "), ansi::BLUE));
    }

    // Candidates
    println!("\n{}", palette.paint("━━━ Candidates ━━━", ansi::GRAY));
    if details.candidates.is_empty() {
        println!("{}", palette.dim("  No candidates produced"));
        println!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
        println!("  • No term occurrence was found");
        println!("  • The text between term and numeral is too long or not filler");
        println!("  • The numeral was blanked as a date, time or size");
        println!("\n{}", palette.dim("  Tip: Set CLINVAL_LOG=clinval=trace to see association decisions"));
    } else {
        for (idx, c) in details.candidates.iter().enumerate() {
            let mark = if details.overlap_dropped.iter().any(|d| same(d, c)) {
                palette.dim("overlap")
            } else if details.bounds_dropped.iter().any(|d| same(d, c)) {
                palette.paint("bounds", ansi::YELLOW)
            } else {
                palette.paint("kept", ansi::GREEN)
            };
            println!("    {} {}", palette.paint(format!("[{}]", idx), ansi::GRAY), fmt_candidate(c, &palette));
            println!("        {} {}", palette.dim("→"), mark);
        }
    }

    // Results
    println!("\n{}", palette.paint("━━━ Results ━━━", ansi::GRAY));
    if res.response.measurement_list.is_empty() {
        println!("{}", palette.dim("  No measurements"));
    }
    for (idx, m) in res.response.measurement_list.iter().enumerate() {
        println!(
            "  {} {} {} {} {}",
            palette.paint(format!("[{}]", idx), ansi::GRAY),
            palette.bold(palette.paint(&m.matching_term, ansi::CYAN)),
            palette.paint(m.condition.as_str(), ansi::BLUE),
            palette.bold(palette.paint(fmt_values(&m.x, m.y.as_ref()), ansi::GREEN)),
            palette.paint(format!("span {}..{}", m.start, m.end), ansi::YELLOW),
        );
    }

    // Timing
    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!(
        "  Total: {}  │  Scan: {}  │  Generate: {}  │  Resolve: {}",
        palette.paint(format!("{:?}", details.total), ansi::GREEN),
        palette.dim(format!("{:?}", details.scan)),
        palette.paint(format!("{:?}", details.generate), ansi::CYAN),
        palette.dim(format!("{:?}", details.resolve)),
    );
    println!();
}

fn same(a: &CandidateSummary, b: &CandidateSummary) -> bool {
    a.start == b.start && a.end == b.end && a.term == b.term
}

fn fmt_values(x: &Value, y: Option<&Value>) -> String {
    match y {
        Some(y) => format!("{x}..{y}"),
        None => x.to_string(),
    }
}

fn fmt_candidate(c: &CandidateSummary, palette: &ansi::Palette) -> String {
    let mut values = fmt_values(&c.x, c.y.as_ref());
    if c.denominator {
        values.push_str(" (denominator)");
    }
    format!(
        "{} {} {} {} {}",
        palette.paint(format!("{}..{}", c.start, c.end), ansi::YELLOW),
        palette.bold(&c.term),
        palette.paint(c.template, ansi::BLUE),
        palette.paint(c.condition.as_str(), ansi::CYAN),
        palette.dim(values),
    )
}
