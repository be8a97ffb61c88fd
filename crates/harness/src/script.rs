use anyhow::{anyhow, bail, Context, Result};
use regex::Regex;
use types::{AccessKind, Vpn};
use vmm::Pid;

/// One parsed script command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Touch `vpn`; a write may carry a byte to store at offset 0.
    Access {
        kind: AccessKind,
        vpn: Vpn,
        value: Option<u8>,
    },
    /// Switch to `pid`, forking it if unknown.
    Switch(Pid),
    /// Dump the current process's page table.
    Show,
    /// Print the ready queue.
    Queue,
    /// Print fault counters.
    Stats,
    /// Print which processes map each frame.
    Frames,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptLine {
    /// 1-based line number in the source script.
    pub line_no: usize,
    pub command: Command,
}

/// Parse a whole script. Blank lines and `#` comments are skipped.
///
/// Accepted forms (case-insensitive):
///   read <vpn> | r <vpn>
///   write <vpn> [byte] | w <vpn> [byte]
///   switch <pid> | s <pid>
///   show | queue | stats | frames
///
/// Numbers are decimal or `0x`-prefixed hex.
pub fn parse_script(content: &str) -> Result<Vec<ScriptLine>> {
    let command_re = Regex::new(r"^(?i)([a-z]+)(?:\s+(\S+))?(?:\s+(\S+))?$")?;
    let mut lines = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = match raw.split_once('#') {
            Some((before, _)) => before.trim(),
            None => raw.trim(),
        };
        if line.is_empty() {
            continue;
        }

        let captures = command_re
            .captures(line)
            .ok_or_else(|| anyhow!("line {}: cannot parse `{}`", line_no, line))?;
        let op = captures[1].to_ascii_lowercase();
        let arg = captures.get(2).map(|m| m.as_str());
        let extra = captures.get(3).map(|m| m.as_str());

        let command = parse_command(&op, arg, extra)
            .with_context(|| format!("line {}: `{}`", line_no, line))?;
        lines.push(ScriptLine { line_no, command });
    }

    Ok(lines)
}

fn parse_command(op: &str, arg: Option<&str>, extra: Option<&str>) -> Result<Command> {
    let command = match op {
        "read" | "r" => {
            no_extra(op, extra)?;
            Command::Access {
                kind: AccessKind::Read,
                vpn: Vpn(parse_number(required(op, arg)?)?),
                value: None,
            }
        }
        "write" | "w" => {
            let value = match extra {
                Some(v) => Some(
                    u8::try_from(parse_number(v)?)
                        .map_err(|_| anyhow!("byte value `{}` does not fit in u8", v))?,
                ),
                None => None,
            };
            Command::Access {
                kind: AccessKind::Write,
                vpn: Vpn(parse_number(required(op, arg)?)?),
                value,
            }
        }
        "switch" | "s" => {
            no_extra(op, extra)?;
            Command::Switch(parse_number(required(op, arg)?)?)
        }
        "show" | "queue" | "stats" | "frames" => {
            if arg.is_some() {
                bail!("`{}` takes no arguments", op);
            }
            match op {
                "show" => Command::Show,
                "queue" => Command::Queue,
                "stats" => Command::Stats,
                _ => Command::Frames,
            }
        }
        _ => bail!("unknown command `{}`", op),
    };
    Ok(command)
}

fn required<'a>(op: &str, arg: Option<&'a str>) -> Result<&'a str> {
    arg.ok_or_else(|| anyhow!("`{}` needs an argument", op))
}

fn no_extra(op: &str, extra: Option<&str>) -> Result<()> {
    match extra {
        Some(v) => bail!("unexpected argument `{}` for `{}`", v, op),
        None => Ok(()),
    }
}

fn parse_number(text: &str) -> Result<u32> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => text.parse::<u32>(),
    };
    parsed.with_context(|| format!("invalid number `{}`", text))
}
