use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }

    let line = |cells: Vec<String>| cells.join("  ").trim_end().to_string();

    println!(
        "{}",
        line(
            headers
                .iter()
                .zip(&widths)
                .map(|(h, &w)| format!("{h:w$}"))
                .collect()
        )
    );
    println!("{}", line(widths.iter().map(|&w| "-".repeat(w)).collect()));

    for row in &rows {
        let cells = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let w = widths.get(i).copied().unwrap_or(0);
                format!("{cell:w$}")
            })
            .collect();
        println!("{}", line(cells));
    }
}
