//! Operator output for loop events: human lines or NDJSON

use std::io::Write;

use is_terminal::IsTerminal;

use ovn_rebuilder::application::RebuildEvent;
use ovn_rebuilder::domain::ports::{SyncEvent, SyncEventSink};

pub const PROMPT: &str = "Press 'Enter' to rebuild and deploy OVN. (Ctrl-C for exit)";

/// Prints events to stdout (errors to stderr)
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    json: bool,
    interactive: bool,
}

impl Reporter {
    pub fn new(json: bool) -> Self {
        Self {
            json,
            interactive: std::io::stdin().is_terminal(),
        }
    }

    pub fn emit(&self, event: &RebuildEvent) {
        if self.json {
            println!("{}", event.to_json());
            return;
        }

        match event {
            RebuildEvent::Waiting => {
                if self.interactive {
                    print!("{} ", PROMPT);
                    let _ = std::io::stdout().flush();
                }
            }
            RebuildEvent::BuildFailed { .. } | RebuildEvent::SyncFailed { .. } => {
                eprint!("{}", render_event(&timestamp(), event));
            }
            _ => print!("{}", render_event(&timestamp(), event)),
        }
    }
}

impl SyncEventSink for Reporter {
    fn on_event(&self, event: SyncEvent) {
        self.emit(&event.into());
    }
}

fn timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

pub fn render_event(timestamp: &str, event: &RebuildEvent) -> String {
    let prefix = format!("[{}]", timestamp);

    match event {
        RebuildEvent::Waiting => String::new(),
        RebuildEvent::BuildStarted { source, jobs } => {
            format!(
                "{} [local] Rebuilding OVN at {} (-j{})\n",
                prefix, source, jobs
            )
        }
        RebuildEvent::BuildFailed { stdout, stderr } => {
            let mut out = format!("{} [local] Build failed\n", prefix);
            for stream in [stdout, stderr] {
                let text = stream.trim_end();
                if !text.is_empty() {
                    out.push_str(text);
                    out.push('\n');
                }
            }
            out
        }
        RebuildEvent::NoChanges => format!("{} [local] No changes in watched files\n", prefix),
        RebuildEvent::TargetsChanged { targets } => {
            format!("{} [local] Changed: {}\n", prefix, targets.join(", "))
        }
        RebuildEvent::RemoteStep { remote, message } => {
            format!("{} [{}] {}\n", prefix, remote, message)
        }
        RebuildEvent::SyncComplete { updated } => {
            format!("{} Synced {} target(s)\n", prefix, updated)
        }
        RebuildEvent::SyncFailed { message } => format!("{} Sync failed: {}\n", prefix, message),
        RebuildEvent::Shutdown => format!("\n{} Tearing down connections. Bye.\n", prefix),
    }
}
