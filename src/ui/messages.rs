//! Coloured one-line status messages for the terminal.

use ansi_term::{Colour, Style};
use std::fmt;

fn line<T: fmt::Display>(style: Style, icon: &str, msg: T) -> String {
    format!("{} {}", style.paint(icon), msg)
}

pub fn info<T: fmt::Display>(msg: T) {
    println!("{}", line(Colour::Blue.bold(), "ℹ️", msg));
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{}", line(Colour::Green.bold(), "✅", msg));
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{}", line(Colour::Yellow.bold(), "⚠️", msg));
}

/// Section title above a table.
pub fn header<T: fmt::Display>(msg: T) {
    println!("{}\n", Colour::Blue.bold().paint(format!("== {} ==", msg)));
}
