use std::io::Write;

use anyhow::{Context, Result};
use types::AccessKind;
use vmm::{SwitchOutcome, System};

use crate::report;
use crate::script::{Command, ScriptLine};

/// Replays script commands against a [`System`], writing one line of
/// output per access or switch.
#[derive(Debug)]
pub struct Runner {
    system: System,
}

impl Runner {
    pub fn new(system: System) -> Self {
        Self { system }
    }

    pub fn system(&self) -> &System {
        &self.system
    }

    /// Run every line, stopping at the first hard fault.
    pub fn run(&mut self, lines: &[ScriptLine], out: &mut dyn Write) -> Result<()> {
        for line in lines {
            self.execute(&line.command, out)
                .with_context(|| format!("line {}: {:?}", line.line_no, line.command))?;
        }
        Ok(())
    }

    pub fn execute(&mut self, command: &Command, out: &mut dyn Write) -> Result<()> {
        let sys = &mut self.system;
        match *command {
            Command::Access { kind, vpn, value } => {
                let pid = sys.current_pid();
                let pfn = match value {
                    Some(byte) => {
                        sys.write_byte(vpn, 0, byte)?;
                        sys.translate(AccessKind::Write, vpn)?
                    }
                    None => sys.access(kind, vpn)?,
                };
                match value {
                    Some(byte) => writeln!(
                        out,
                        "[{}] {:<5} vpn {:>3} -> pfn {} (0x{:02x})",
                        pid, kind, vpn, pfn, byte
                    )?,
                    None => writeln!(out, "[{}] {:<5} vpn {:>3} -> pfn {}", pid, kind, vpn, pfn)?,
                }
            }
            Command::Switch(pid) => {
                let from = sys.current_pid();
                let how = match sys.switch_process(pid) {
                    SwitchOutcome::Activated => "activated",
                    SwitchOutcome::Forked => "forked",
                    SwitchOutcome::AlreadyRunning => "already running",
                };
                writeln!(out, "[{}] switch -> {} ({})", from, pid, how)?;
            }
            Command::Show => report::write_page_table(out, sys, sys.current())?,
            Command::Queue => report::write_queue(out, sys)?,
            Command::Stats => report::write_stats(out, sys)?,
            Command::Frames => report::write_frames(out, sys)?,
        }
        Ok(())
    }
}
