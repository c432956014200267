use std::collections::BTreeMap;

use crate::{Coord, Snapshot};

/// Draws the board of a snapshot as a box of text, one cell per two columns.
///
/// Vessels show as their seat number, fish as `>`. A fish hiding under a
/// vessel is not drawn. Below the box, one line per player lists the catch
/// and the movement budget.
pub fn visualize_snapshot(snapshot: &Snapshot) -> String {
    let size = snapshot.board_size;
    let mut marks: BTreeMap<Coord, char> = BTreeMap::new();
    for &fish in &snapshot.fish_positions {
        marks.insert(fish, '>');
    }
    for player in &snapshot.players {
        if let Some(pos) = player.position {
            let seat = char::from_digit(player.id as u32 % 10, 10).unwrap_or('?');
            marks.insert(pos, seat);
        }
    }

    // Draw the top of the box
    let mut result = String::from("    ");
    for x in 0..size {
        result += &format!("{:<2}", x % 10);
    }
    result += "\n   ╭";
    for _ in 0..size {
        result += "──";
    }
    result += "╮\n";

    for y in 0..size {
        result += &format!("{:>2} │", y);
        for x in 0..size {
            match marks.get(&Coord::new(x, y)) {
                Some(mark) => result += &format!("{} ", mark),
                None => result += "· ",
            }
        }
        result += "│\n";
    }

    // Draw the bottom of the box
    result += "   ╰";
    for _ in 0..size {
        result += "──";
    }
    result += "╯";

    result += &format!("\nround {}, {}", snapshot.round, snapshot.phase);
    for player in &snapshot.players {
        let marker = if snapshot.current_player == Some(player.id) {
            '*'
        } else {
            ' '
        };
        result += &format!(
            "\n{}{} {:<12} fish {}  moves {}",
            marker, player.id, player.name, player.fish_collected, player.moves_remaining
        );
    }
    result
}
