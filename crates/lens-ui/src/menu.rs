//! Interactive action menu.
//!
//! Reads numbered actions line by line, records every raw input in the
//! interaction log, and prints query results. Generic over the input and
//! output streams so tests can drive it with scripted buffers.

use std::io::{self, BufRead, Write};

use chrono::NaiveDate;

use lens_core::event_log::EventLog;
use lens_core::formatting::{format_rate, format_zip_set};
use lens_core::models::VaccinationKind;
use lens_engine::clusters::ClusterCriteria;
use lens_engine::data_manager::DataManager;

const DATE_FORMAT: &str = "%Y-%m-%d";

// ── Menu ──────────────────────────────────────────────────────────────────────

/// Line-oriented console menu over the query façade.
pub struct Menu<'e, R, W> {
    /// Query façade answering every action.
    manager: DataManager,
    /// Interaction log receiving raw inputs and cluster parameters.
    events: &'e mut EventLog,
    /// Line source, usually locked stdin.
    input: R,
    /// Result sink, usually stdout.
    output: W,
}

impl<'e, R: BufRead, W: Write> Menu<'e, R, W> {
    pub fn new(manager: DataManager, events: &'e mut EventLog, input: R, output: W) -> Self {
        Self {
            manager,
            events,
            input,
            output,
        }
    }

    /// Run the menu loop until the user exits or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        self.print_menu()?;
        loop {
            let Some(input) = self.prompt("> ")? else {
                // End of input behaves like the exit action.
                return Ok(());
            };
            self.events.log(&format!("User input: {}", input));

            let Ok(action) = input.parse::<i64>() else {
                writeln!(self.output, "Please enter a number")?;
                continue;
            };
            tracing::debug!(action, "menu action");
            match action {
                0 => return Ok(()),
                1 => self.show_available_actions()?,
                2 => self.show_total_population()?,
                3 => self.show_vaccinations_per_capita()?,
                4 => self.show_average_market_value()?,
                5 => self.show_average_livable_area()?,
                6 => self.show_market_value_per_capita()?,
                7 => self.show_wellness_clusters()?,
                _ => writeln!(self.output, "Invalid action")?,
            }
        }
    }

    // ── Actions ───────────────────────────────────────────────────────────

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.output, "Available Actions:")?;
        writeln!(self.output, "0. Exit")?;
        writeln!(self.output, "1. Show available actions")?;
        writeln!(self.output, "2. Show total population")?;
        writeln!(self.output, "3. Show vaccinations per capita")?;
        writeln!(self.output, "4. Show average market value")?;
        writeln!(self.output, "5. Show average livable area")?;
        writeln!(self.output, "6. Show market value per capita")?;
        writeln!(self.output, "7. Show wellness clusters")
    }

    fn show_available_actions(&mut self) -> io::Result<()> {
        writeln!(self.output, "Available actions based on loaded data:")?;
        self.print_menu()
    }

    fn show_total_population(&mut self) -> io::Result<()> {
        let total = self.manager.total_population();
        writeln!(self.output, "Total population: {}", total)
    }

    fn show_vaccinations_per_capita(&mut self) -> io::Result<()> {
        let Some(date_input) = self.prompt("Enter date (YYYY-MM-DD): ")? else {
            return Ok(());
        };
        let Ok(date) = NaiveDate::parse_from_str(&date_input, DATE_FORMAT) else {
            writeln!(self.output, "Invalid date, please use YYYY-MM-DD.")?;
            return Ok(());
        };

        let Some(kind_input) = self.prompt("Enter type (partial/full): ")? else {
            return Ok(());
        };
        let Ok(kind) = kind_input.parse::<VaccinationKind>() else {
            writeln!(self.output, "Invalid type, please enter partial or full.")?;
            return Ok(());
        };

        let results = self.manager.vaccinations_per_capita(kind, date);
        for (zip, rate) in results {
            writeln!(self.output, "{}: {}", zip, format_rate(*rate))?;
        }
        Ok(())
    }

    fn show_average_market_value(&mut self) -> io::Result<()> {
        let Some(zip) = self.prompt("Enter ZIP code: ")? else {
            return Ok(());
        };
        let average = self.manager.average_market_value(&zip);
        writeln!(self.output, "Average market value: {}", average)
    }

    fn show_average_livable_area(&mut self) -> io::Result<()> {
        let Some(zip) = self.prompt("Enter ZIP code: ")? else {
            return Ok(());
        };
        let average = self.manager.average_livable_area(&zip);
        writeln!(self.output, "Average livable area: {}", average)
    }

    fn show_market_value_per_capita(&mut self) -> io::Result<()> {
        let Some(zip) = self.prompt("Enter ZIP code: ")? else {
            return Ok(());
        };
        let value = self.manager.market_value_per_capita(&zip);
        writeln!(self.output, "Market value per capita: {}", value)
    }

    fn show_wellness_clusters(&mut self) -> io::Result<()> {
        let Some(date) = self.prompt_cluster_date()? else {
            return Ok(());
        };
        let Some(min_rate) = self.prompt_min_rate()? else {
            return Ok(());
        };
        let Some(min_area) = self.prompt_min_area()? else {
            return Ok(());
        };
        let Some(min_population) = self.prompt_min_population()? else {
            return Ok(());
        };

        let criteria = ClusterCriteria {
            min_rate,
            min_area,
            min_population,
        };
        let clusters = self.manager.wellness_clusters(date, &criteria);
        if clusters.is_empty() {
            writeln!(self.output, "No clusters found matching the criteria.")?;
        } else {
            for (index, cluster) in clusters.iter().enumerate() {
                writeln!(self.output, "Cluster {}: {}", index + 1, format_zip_set(cluster))?;
            }
        }
        Ok(())
    }

    // ── Cluster parameter prompts ─────────────────────────────────────────

    /// Each parameter re-prompts until valid; the accepted value is written
    /// to the interaction log. `None` means input ended mid-prompt.
    fn prompt_cluster_date(&mut self) -> io::Result<Option<NaiveDate>> {
        loop {
            let Some(input) = self.prompt("Enter date (YYYY-MM-DD) for vaccination data: ")? else {
                return Ok(None);
            };
            if let Ok(date) = NaiveDate::parse_from_str(&input, DATE_FORMAT) {
                self.events.log(&format!("Cluster date: {}", input));
                return Ok(Some(date));
            }
            writeln!(self.output, "Invalid date, please use YYYY-MM-DD.")?;
        }
    }

    fn prompt_min_rate(&mut self) -> io::Result<Option<f64>> {
        loop {
            let Some(input) = self.prompt("Enter minimum full-vaccination rate (0.0-1.0): ")?
            else {
                return Ok(None);
            };
            if let Ok(rate) = input.parse::<f64>() {
                if (0.0..=1.0).contains(&rate) {
                    self.events.log(&format!("Min rate: {}", rate));
                    return Ok(Some(rate));
                }
            }
            writeln!(
                self.output,
                "Invalid rate, please enter a number between 0.0 and 1.0."
            )?;
        }
    }

    fn prompt_min_area(&mut self) -> io::Result<Option<u64>> {
        loop {
            let Some(input) = self.prompt("Enter minimum average livable area (sq ft): ")? else {
                return Ok(None);
            };
            if let Ok(area) = input.parse::<u64>() {
                self.events.log(&format!("Min area: {}", area));
                return Ok(Some(area));
            }
            writeln!(
                self.output,
                "Invalid area, please enter a non-negative integer."
            )?;
        }
    }

    fn prompt_min_population(&mut self) -> io::Result<Option<u64>> {
        loop {
            let Some(input) = self.prompt("Enter minimum population per ZIP: ")? else {
                return Ok(None);
            };
            if let Ok(population) = input.parse::<u64>() {
                self.events.log(&format!("Min population: {}", population));
                return Ok(Some(population));
            }
            writeln!(
                self.output,
                "Invalid population, please enter a non-negative integer."
            )?;
        }
    }

    // ── Line handling ─────────────────────────────────────────────────────

    /// Print `text` without a newline and read one trimmed line. `None`
    /// means end of input.
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
