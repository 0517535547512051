use std::io::{self, Write};

use console::style;

pub fn error(message: &str) {
    let _ = writeln!(io::stderr(), "{}", style(message).red());
}
