//! Interactive session: reads commands line by line and prints the summary
//! once input settles.
//!
//! Every command that changes the form restarts the debounce slot. The
//! summary is recomputed and printed only after no change has arrived for
//! the configured delay, so pasting a batch of commands produces a single
//! report.

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use fare_core::{DebounceSlot, FareForm};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::command::{Outcome, SessionCommand};
use crate::report::render;

/// Counters reported when a session ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub commands: usize,
    pub recomputes: usize,
}

/// Runs a session until `quit` or end of input.
///
/// A recompute is scheduled at start, mirroring the form's initial
/// calculation on load. A recompute still pending when input ends is
/// allowed to fire before returning.
pub async fn run_session<R, W>(
    form: &mut FareForm,
    delay: Duration,
    input: R,
    out: &mut W,
) -> Result<SessionStats>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut slot = DebounceSlot::new(delay);
    let mut stats = SessionStats::default();

    slot.trigger(Instant::now());

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read session input")? else {
                    debug!("end of session input");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                stats.commands += 1;

                let command = match SessionCommand::parse(&line) {
                    Ok(command) => command,
                    Err(e) => {
                        writeln!(out, "error: {e}")?;
                        continue;
                    }
                };

                match command.apply(form) {
                    Outcome::Changed => slot.trigger(Instant::now()),
                    Outcome::ChangedWithNotice(message) => {
                        writeln!(out, "{message}")?;
                        slot.trigger(Instant::now());
                    }
                    Outcome::Rejected(message) => writeln!(out, "{message}")?,
                    Outcome::Show if slot.is_pending() => {
                        slot.cancel();
                        recompute_and_print(form, out, &mut stats)?;
                    }
                    Outcome::Show => write!(out, "{}", render(form))?,
                    Outcome::Quit => break,
                }
            }
            () = slot.expired() => {
                if slot.fire_if_due(Instant::now()) {
                    recompute_and_print(form, out, &mut stats)?;
                }
            }
        }
    }

    if slot.is_pending() {
        slot.expired().await;
        slot.cancel();
        recompute_and_print(form, out, &mut stats)?;
    }

    info!(
        commands = stats.commands,
        recomputes = stats.recomputes,
        "session finished"
    );
    Ok(stats)
}

fn recompute_and_print<W: Write>(
    form: &mut FareForm,
    out: &mut W,
    stats: &mut SessionStats,
) -> Result<()> {
    form.recompute();
    stats.recomputes += 1;
    write!(out, "{}", render(form))?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use fare_core::FareConfig;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tokio::io::{AsyncWriteExt, BufReader};

    use super::*;

    const DELAY: Duration = Duration::from_millis(300);

    #[tokio::test(start_paused = true)]
    async fn burst_of_commands_recomputes_once() {
        let mut form = FareForm::default();
        let mut out = Vec::new();
        let input = "base-old 100\nbase-new 80\ntax 1 old 10\ntax 1 new 15\n";

        let stats = run_session(&mut form, DELAY, BufReader::new(input.as_bytes()), &mut out)
            .await
            .unwrap();

        assert_eq!(stats, SessionStats { commands: 4, recomputes: 1 });
        assert_eq!(form.result().total_fare_diff, dec!(-15));
    }

    #[tokio::test(start_paused = true)]
    async fn pauses_longer_than_delay_produce_separate_reports() {
        let mut form = FareForm::default();
        let mut out = Vec::new();
        let (reader, mut writer) = tokio::io::duplex(256);

        let feeder = tokio::spawn(async move {
            writer.write_all(b"base-new 50\n").await.unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;
            writer.write_all(b"base-old 20\n").await.unwrap();
            tokio::time::sleep(Duration::from_millis(1_000)).await;
            writer.write_all(b"flexible no\npenalty 5\n").await.unwrap();
        });

        let stats = run_session(&mut form, DELAY, BufReader::new(reader), &mut out)
            .await
            .unwrap();
        feeder.await.unwrap();

        assert_eq!(stats, SessionStats { commands: 4, recomputes: 2 });
        assert_eq!(form.result().total_fare_diff, dec!(35));
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_add_prints_alert_without_recompute() {
        let mut form = FareForm::new(&FareConfig {
            max_tax_rows: 1,
            ..FareConfig::default()
        });
        let mut out = Vec::new();

        let stats = run_session(&mut form, DELAY, BufReader::new(&b"add\n"[..]), &mut out)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Maximum of 1 tax rows reached.\n"));
        assert_eq!(stats.recomputes, 1); // the initial one only
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_lines_are_reported_and_skipped() {
        let mut form = FareForm::default();
        let mut out = Vec::new();

        run_session(&mut form, DELAY, BufReader::new(&b"bogus\n\nfee 3\n"[..]), &mut out)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("error: unknown command 'bogus'"));
    }

    #[tokio::test(start_paused = true)]
    async fn show_recomputes_pending_changes_first() {
        let mut form = FareForm::default();
        let mut out = Vec::new();

        let stats = run_session(
            &mut form,
            DELAY,
            BufReader::new(&b"add\ntax 2 new 4\nshow\n"[..]),
            &mut out,
        )
        .await
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("  2               0.00         4.00         4.00\n"));
        assert!(text.contains("Tax difference:                4.00"));
        assert_eq!(stats, SessionStats { commands: 3, recomputes: 1 });
    }

    #[tokio::test(start_paused = true)]
    async fn show_without_changes_prints_last_summary() {
        let mut form = FareForm::default();
        let mut out = Vec::new();
        let (reader, mut writer) = tokio::io::duplex(64);

        let feeder = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(1_000)).await;
            writer.write_all(b"show\n").await.unwrap();
        });

        let stats = run_session(&mut form, DELAY, BufReader::new(reader), &mut out)
            .await
            .unwrap();
        feeder.await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("Total fare difference:").count(), 2);
        assert_eq!(stats.recomputes, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn quit_stops_reading_but_flushes_pending_recompute() {
        let mut form = FareForm::default();
        let mut out = Vec::new();

        let stats = run_session(
            &mut form,
            DELAY,
            BufReader::new(&b"base-new 10\nquit\nbase-new 99\n"[..]),
            &mut out,
        )
        .await
        .unwrap();

        assert_eq!(stats, SessionStats { commands: 2, recomputes: 1 });
        assert_eq!(form.result().base_fare_diff, dec!(10));
    }
}
