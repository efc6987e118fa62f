//! Interactive selection shell.
//!
//! Keeps one [`OrderSession`] alive between commands so dishes can be toggled one at a
//! time while the running total is shown after every change.

use super::{AppData, commands};
use crate::{
    core::{
        export::{self, ReceiptFormat},
        selection::OrderSession,
    },
    errors::{Error, Result},
};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{error, info};

const HELP: &str = "Commands:\n\
    \x20 menu                 show the catalog with selection marks\n\
    \x20 toggle <id>...       select or unselect dishes\n\
    \x20 total                show the selected dishes and total\n\
    \x20 clear                unselect everything\n\
    \x20 confirm              record the selected dishes as an order\n\
    \x20 receipt <path> [html]  write a receipt for the selection\n\
    \x20 history              show order history\n\
    \x20 reload               reload the catalog (clears the selection)\n\
    \x20 help                 show this message\n\
    \x20 quit                 leave the shell";

/// What the shell loop should do after a line has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellControl {
    /// Read the next line
    Continue,
    /// Leave the shell
    Quit,
}

/// Interactive session state.
pub struct Shell<'a> {
    data: &'a AppData,
    session: OrderSession,
}

impl<'a> Shell<'a> {
    /// Starts a shell over a fresh catalog load.
    pub async fn start(data: &'a AppData) -> Result<Self> {
        let session = OrderSession::load(&data.database).await?;
        Ok(Self { data, session })
    }

    /// The session behind the shell.
    #[must_use]
    pub const fn session(&self) -> &OrderSession {
        &self.session
    }

    /// Handles one input line. Every error is reported to `out` and the shell carries on.
    pub async fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<ShellControl> {
        match self.dispatch(line, out).await {
            Ok(control) => Ok(control),
            Err(e) if e.is_validation() => {
                writeln!(out, "❌ {}", commands::describe_rejection(&e))?;
                Ok(ShellControl::Continue)
            }
            Err(e) => {
                error!("Shell command failed: {}", e);
                writeln!(out, "Error: {e}")?;
                Ok(ShellControl::Continue)
            }
        }
    }

    async fn dispatch<W: Write>(&mut self, line: &str, out: &mut W) -> Result<ShellControl> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Ok(ShellControl::Continue);
        };
        let args: Vec<&str> = words.collect();

        match command {
            "menu" => self.print_menu(out)?,
            "toggle" => {
                if args.is_empty() {
                    return Err(Error::Validation {
                        message: "Usage: toggle <id>...".to_string(),
                    });
                }
                for arg in args {
                    let id = parse_id(arg)?;
                    self.session.toggle(id)?;
                }
                self.print_total(out)?;
            }
            "total" => self.print_total(out)?,
            "clear" => {
                self.session.clear();
                self.print_total(out)?;
            }
            "confirm" => {
                let saved = self.session.submit(&self.data.database).await?;
                writeln!(
                    out,
                    "✅ Order #{} saved! Total: {}",
                    saved.id,
                    export::format_price(saved.total_amount, &self.data.config.currency)
                )?;
            }
            "receipt" => self.write_receipt(&args, out)?,
            "history" => commands::show_history(self.data, out).await?,
            "reload" => {
                self.session.reload(&self.data.database).await?;
                self.print_menu(out)?;
            }
            "help" => writeln!(out, "{HELP}")?,
            "quit" | "exit" => return Ok(ShellControl::Quit),
            other => {
                return Err(Error::Validation {
                    message: format!("Unknown command '{other}', type 'help' for a list"),
                });
            }
        }
        Ok(ShellControl::Continue)
    }

    fn print_menu<W: Write>(&self, out: &mut W) -> Result<()> {
        for dish in self.session.catalog() {
            let mark = if self.session.is_selected(dish.id) { "[x]" } else { "[ ]" };
            write!(out, "{mark} ")?;
            commands::write_dish_line(out, dish, &self.data.config.currency)?;
        }
        Ok(())
    }

    fn print_total<W: Write>(&self, out: &mut W) -> Result<()> {
        let summary = self.session.summary();
        writeln!(
            out,
            "Selected {} dish(es), total {}",
            summary.dishes.len(),
            export::format_price(summary.total, &self.data.config.currency)
        )?;
        Ok(())
    }

    fn write_receipt<W: Write>(&self, args: &[&str], out: &mut W) -> Result<()> {
        let Some(path) = args.first() else {
            return Err(Error::Validation {
                message: "Usage: receipt <path> [text|html]".to_string(),
            });
        };
        let format = match args.get(1) {
            Some(raw) => raw
                .parse::<ReceiptFormat>()
                .map_err(|message| Error::Validation { message })?,
            None => ReceiptFormat::Text,
        };

        let summary = self.session.summary();
        if summary.is_empty() {
            return Err(Error::EmptySelection);
        }
        export::export_receipt(
            path,
            format,
            &chrono::Utc::now(),
            &summary.dishes,
            summary.total,
            &self.data.config.currency,
        )?;
        writeln!(out, "✅ Order exported to {path}")?;
        Ok(())
    }
}

fn parse_id(raw: &str) -> Result<i64> {
    raw.parse().map_err(|_| Error::Validation {
        message: format!("'{raw}' is not a dish id"),
    })
}

/// Runs the shell over `input` until `quit` or end of input, writing to `out`.
pub async fn run_shell<R, W>(data: &AppData, input: R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut shell = Shell::start(data).await?;
    info!("Interactive shell started");

    writeln!(out, "Type 'help' for commands.")?;
    shell.print_menu(out)?;

    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if shell.handle_line(&line, out).await? == ShellControl::Quit {
            break;
        }
    }

    info!("Interactive shell closed");
    Ok(())
}
