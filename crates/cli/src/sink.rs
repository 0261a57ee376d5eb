//! Styled stdout report sink.

use console::Style;

use srcfix_core::report::{ReportEvent, ReportSink};

use crate::style;

/// Prints each report line to stdout, coloured by outcome.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ReportSink for ConsoleSink {
    fn emit(&mut self, event: &ReportEvent) {
        let line = event.to_string();
        match event {
            ReportEvent::Changed { .. } => println!("{}", Style::new().green().apply_to(line)),
            ReportEvent::Unchanged { remaining, .. } if *remaining > 0 => {
                println!("{}", Style::new().yellow().apply_to(line))
            }
            ReportEvent::Unchanged { .. } => println!("{}", style::dim(&line)),
            ReportEvent::Failed { .. } => println!("{}", Style::new().red().apply_to(line)),
            ReportEvent::Summary(_) => {
                println!();
                println!("{}", style::header(&line));
            }
        }
    }
}
