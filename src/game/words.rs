//! Word extraction: every horizontal and vertical run of two or more letters

use super::Board;

/// Shortest run that counts as a word.
pub const MIN_WORD_LENGTH: usize = 2;

/// Collect runs of consecutive letters, rows first (left to right), then
/// columns (top to bottom). Single letters are dropped. Duplicates are kept.
pub fn extract_words(board: &Board) -> Vec<String> {
    let mut words = Vec::new();
    for y in 0..board.size() {
        collect_runs(board.row(y), &mut words);
    }
    for x in 0..board.size() {
        collect_runs(board.column(x), &mut words);
    }
    words
}

fn collect_runs(line: impl Iterator<Item = Option<char>>, words: &mut Vec<String>) {
    let mut run = String::new();
    for cell in line {
        match cell {
            Some(letter) => run.push(letter),
            None => flush(&mut run, words),
        }
    }
    flush(&mut run, words);
}

fn flush(run: &mut String, words: &mut Vec<String>) {
    if run.chars().count() >= MIN_WORD_LENGTH {
        words.push(std::mem::take(run));
    } else {
        run.clear();
    }
}
