use crate::RankedPlayer;

const HEADERS: [&str; 11] = [
    "ID", "Name", "Game", "Username", "Level", "Rank", "Team", "Role", "Favorite", "Avatar",
    "Registered",
];

fn row(player: &RankedPlayer) -> [String; 11] {
    let record = &player.record;
    let text = |field: &Option<String>| field.clone().unwrap_or_default();
    [
        record.id.to_string(),
        text(&record.player_name),
        text(&record.game),
        text(&record.username),
        record.level.to_string(),
        player.rank.to_string(),
        text(&record.team),
        text(&record.role),
        text(&record.favorite),
        record.avatar.clone(),
        record.date_registered.format("%Y-%m-%d %H:%M:%S").to_string(),
    ]
}

fn format_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Renders players as a left-aligned text table, one line per player.
pub fn render(players: &[RankedPlayer]) -> String {
    let rows: Vec<[String; 11]> = players.iter().map(row).collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = vec![format_line(HEADERS.into_iter(), &widths)];
    for row in &rows {
        lines.push(format_line(row.iter().map(String::as_str), &widths));
    }
    lines.join("\n")
}
