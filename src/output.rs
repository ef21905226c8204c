//! This module is in charge of outputting the final analysis results

use crate::{
    config::Configuration,
    cutflow::{Counter, CutFlow},
    histogram::{Histogram, HistogramSet},
    numeric::Float,
    selection::ANALYSIS_NAME,
    Result,
};

use prefix_num_ops::real::*;
use time::{format_description, OffsetDateTime};

use std::{io, io::Write, time::Duration};

/// Number of significant digits in the output, like printf's %g
const SIG_DIGITS: usize = 6;

/// Horizontal separator between output sections
const SEPARATOR: &str = "---------------------------------------------";

/// Output the analysis results
pub fn dump_results(
    writer: &mut impl Write,
    cfg: &Configuration,
    cutflow: &CutFlow,
    histograms: &HistogramSet,
    elapsed_time: Duration,
) -> Result<()> {
    // Compute a timestamp of when the run ended
    let format = format_description::parse(
        "[day]-[month repr:short]-[year repr:last_two]   [hour]:[minute]:[second]",
    )?;
    let timestamp = OffsetDateTime::now_utc().format(&format)?;

    // Run statistics
    writeln_kv(writer, format!("{} analysis results", ANALYSIS_NAME).as_str())?;
    writeln_kv(writer, timestamp.as_str())?;
    writeln_kv(writer, SEPARATOR)?;
    writeln_kv(writer, ("Events analyzed", cfg.num_events))?;
    let elapsed_secs = elapsed_time.as_secs_f64() as Float;
    writeln_kv(writer, ("Elapsed time (s)", elapsed_secs))?;
    let secs_per_ev = elapsed_secs / (cfg.num_events as Float);
    writeln_kv(writer, ("Time per event (s)", secs_per_ev))?;

    write_cutflow(writer, cutflow)?;
    for histogram in histograms.iter() {
        write_histogram(writer, histogram)?;
    }
    Ok(())
}

/// Write down the cut-flow table
fn write_cutflow(writer: &mut impl Write, cutflow: &CutFlow) -> io::Result<()> {
    writeln_kv(writer, SEPARATOR)?;
    writeln_kv(writer, ("Regions", cutflow.regions().join(", ").as_str()))?;
    let initial = cutflow.initial();
    writeln_kv(writer, ("Initial events", initial.entries as usize))?;
    writeln_kv(writer, ("Initial weighted events", initial.sum_weights))?;
    writeln!(
        writer,
        " {:<24}{:>10}{:>10}{:>14}{:>14}{:>12}",
        "Cut", "evaluated", "passed", "sum(w)", "err(w)", "efficiency"
    )?;
    for cut in cutflow.cuts() {
        let efficiency = cut
            .efficiency()
            .map_or_else(|| "n/a".to_owned(), |eff| engineering(eff, SIG_DIGITS));
        writeln!(
            writer,
            " {:<24}{:>10}{:>10}{:>14}{:>14}{:>12}",
            cut.name,
            cut.evaluated.entries,
            cut.passed.entries,
            engineering(cut.passed.sum_weights, SIG_DIGITS),
            engineering(weight_error(&cut.passed), SIG_DIGITS),
            efficiency,
        )?;
    }
    Ok(())
}

/// Statistical uncertainty on a weighted event count
fn weight_error(counter: &Counter) -> Float {
    sqrt(counter.sum_weights2)
}

/// Write down the contents of a histogram
fn write_histogram(writer: &mut impl Write, histogram: &Histogram) -> io::Result<()> {
    writeln_kv(writer, SEPARATOR)?;
    writeln_kv(writer, ("Histogram", histogram.name.as_str()))?;
    writeln_kv(writer, ("Entries", histogram.entries as usize))?;
    match histogram.mean() {
        Some(mean) => writeln_kv(writer, ("Mean", mean))?,
        None => writeln_kv(writer, ("Mean", "n/a"))?,
    }
    writeln_kv(writer, ("Underflow", histogram.underflow))?;
    writeln_kv(writer, ("Overflow", histogram.overflow))?;
    let edges = histogram.bin_edges();
    for (bin, (content, sum_weights2)) in histogram
        .bins
        .iter()
        .zip(&histogram.sum_weights2)
        .enumerate()
    {
        writeln!(
            writer,
            "   [{:>8}, {:>8}[ {:>14} +- {:<14}",
            engineering(edges[bin], SIG_DIGITS),
            engineering(edges[bin + 1], SIG_DIGITS),
            engineering(*content, SIG_DIGITS),
            engineering(sqrt(*sum_weights2), SIG_DIGITS),
        )?;
    }
    Ok(())
}

/// Text output facility with one item per line
fn writeln_kv(writer: &mut impl Write, data: impl WriteKv) -> io::Result<()> {
    write!(writer, " ")?;
    data.write(writer)?;
    writeln!(writer)
}

/// Trait implemented by things which can be printed as results
trait WriteKv: Sized {
    /// Write down `self` to the output
    fn write(self, writer: &mut impl Write) -> io::Result<()>;
}

impl WriteKv for &str {
    // Strings work in the usual way
    fn write(self, writer: &mut impl Write) -> io::Result<()> {
        write!(writer, "{}", self)
    }
}

impl WriteKv for usize {
    // Integers work in the usual way too
    fn write(self, writer: &mut impl Write) -> io::Result<()> {
        write!(writer, "{}", self)
    }
}

impl WriteKv for Float {
    // Floats use a close approximation of %g
    fn write(self, writer: &mut impl Write) -> io::Result<()> {
        write!(writer, "{}", engineering(self, SIG_DIGITS))
    }
}

impl<T: WriteKv> WriteKv for (&str, T) {
    // Key-value output that uses fixed-size columns for better readability
    fn write(self, writer: &mut impl Write) -> io::Result<()> {
        write!(writer, "{:<31}: ", self.0)?;
        self.1.write(writer)
    }
}

/// Format a floating-point number using "engineering" notation
///
/// Analogous to the %g format of the C printf function, this switches between
/// naive and scientific notation when the number becomes so small that
/// printing leading zeroes would end up larger than the scientific notation,
/// or so large that more significant digits than requested would be needed.
///
fn engineering(x: Float, sig_digits: usize) -> String {
    let precision = sig_digits.saturating_sub(1);
    if x == 0. {
        // Zero is special because you can't take its log
        return "0".to_owned();
    }

    // Otherwise, use log to evaluate order of magnitude
    let log_x = abs(x).log10();
    if log_x >= -4. && log_x < sig_digits as Float {
        // Rust's precision is a number of digits after the decimal point, so
        // it must be adjusted to the magnitude. Numbers smaller than 1 get one
        // extra digit since the leading zero is not significant.
        let mut decimals = precision as isize - log_x.trunc() as isize;
        if log_x < 0. {
            decimals += 1;
        }
        let str_with_zeros = format!("{:.1$}", x, decimals.max(0) as usize);

        // Trailing zeros and decimal point are not expected in naive notation
        if str_with_zeros.contains('.') {
            str_with_zeros
                .trim_end_matches('0')
                .trim_end_matches('.')
                .to_owned()
        } else {
            str_with_zeros
        }
    } else {
        format!("{:.1$e}", x, precision)
    }
}
