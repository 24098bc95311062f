use analytics::ChartConfig;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets::UTF8_FULL};
use dashboard::ChartCanvas;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

/// Draws charts as terminal tables and, optionally, exports the chart
/// configuration as JSON for a browser charting library.
#[derive(Debug, Default)]
pub struct TerminalCanvas {
    print: bool,
    export: Option<PathBuf>,
    next_id: u64,
}

impl TerminalCanvas {
    pub fn new(print: bool, export: Option<PathBuf>) -> Self {
        Self {
            print,
            export,
            next_id: 0,
        }
    }

    fn export_json(&self, config: &ChartConfig) {
        let Some(path) = &self.export else {
            return;
        };
        let written = File::create(path)
            .map_err(|e| e.to_string())
            .and_then(|file| {
                serde_json::to_writer_pretty(BufWriter::new(file), config).map_err(|e| e.to_string())
            });
        match written {
            Ok(()) => tracing::info!(path = %path.display(), "Chart configuration exported."),
            Err(e) => tracing::error!(path = %path.display(), error = %e, "Failed to export chart."),
        }
    }
}

impl ChartCanvas for TerminalCanvas {
    type Handle = u64;

    fn mount(&mut self, config: &ChartConfig) -> u64 {
        self.next_id += 1;
        self.export_json(config);

        if self.print {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic);

            let mut header = vec![Cell::new("Day")];
            header.extend(config.data.datasets.iter().map(|d| Cell::new(&d.label)));
            table.set_header(header);

            for (row, label) in config.data.labels.iter().enumerate() {
                let mut cells = vec![Cell::new(label)];
                cells.extend(config.data.datasets.iter().map(|d| {
                    let value = d.data.get(row).copied().unwrap_or_default();
                    Cell::new(format!("{}{value:.2}", config.options.value_prefix))
                        .set_alignment(CellAlignment::Right)
                }));
                table.add_row(cells);
            }
            println!("{table}");
        }
        self.next_id
    }

    fn release(&mut self, handle: u64) {
        tracing::trace!(handle, "Chart released.");
    }
}
