//! Interactive room selection.

use std::io::{BufRead, Write};

/// Prompt for one room out of `rooms`.
///
/// Prints a numbered menu and reads lines until a valid index arrives; an
/// empty line picks index 0. Returns `None` when `rooms` is empty or the
/// input stream ends before a choice is made.
///
/// # Errors
///
/// Returns an error if the menu cannot be written or input cannot be read.
pub fn choose_one_room<R: BufRead, W: Write>(
    rooms: &[String],
    mut input: R,
    mut output: W,
) -> std::io::Result<Option<String>> {
    if rooms.is_empty() {
        return Ok(None);
    }

    writeln!(output, "Select a room to monitor")?;
    for (index, room) in rooms.iter().enumerate() {
        writeln!(output, "{index}: {room}")?;
    }

    loop {
        write!(output, "[0]: ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let entered = line.trim_end_matches(['\r', '\n']);

        let choice = if entered.is_empty() {
            0
        } else {
            match entered.trim().parse::<usize>() {
                Ok(value) => value,
                Err(_) => {
                    writeln!(output, "Type a valid integer")?;
                    continue;
                }
            }
        };

        if let Some(room) = rooms.get(choice) {
            return Ok(Some(room.clone()));
        }
        writeln!(output, "Type a valid integer")?;
    }
}
