//! Console output.

use std::fmt::Debug;

use mp3fan::{avec::ByteLengths, sans::Unit};

const RULE: &str = "====================================";

pub fn heading(heading: &str) {
    println!("{RULE}");
    println!(" {heading}");
    println!("{RULE}");
}

/// Print a frame under a heading, or a placeholder if there is none.
pub fn frame<F: Debug>(frame: Option<&Unit<F>>, description: &str) {
    heading(description);

    match frame {
        Some(frame) => println!("{frame:#?}\n"),
        None => println!("not exist\n"),
    }
}

pub fn summary(kind: &str, lengths: &ByteLengths) {
    heading(&format!("{kind} Summary"));

    for (length, count) in lengths.iter() {
        println!("Frames of {} byte: {}", grouped(length), grouped(count));
    }

    println!("total Frames: {}\n", grouped(lengths.total()));
}

/// Format a number with comma-separated thousands.
pub fn grouped(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out
}
