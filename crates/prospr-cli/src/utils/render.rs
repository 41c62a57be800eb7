use prospr_core::core::models::lattice::Lattice;

/// Render a 2D conformation as a character grid with chain links, the
/// y-axis pointing up. Returns `None` for other dimensionalities.
pub fn render_2d(lattice: &Lattice) -> Option<String> {
    if lattice.dim() != 2 {
        return None;
    }

    let types: Vec<char> = lattice.sequence().chars().collect();

    // Residues live on doubled coordinates so the links between chain
    // neighbours get their own cells.
    let mut pos = (0i32, 0i32);
    let mut cells = vec![((0i32, 0i32), types[0])];

    for (i, &m) in lattice.hash_fold().iter().enumerate() {
        let prev = pos;
        match m {
            1 => pos.0 += 1,
            -1 => pos.0 -= 1,
            2 => pos.1 += 1,
            -2 => pos.1 -= 1,
            _ => return None,
        }
        let link = if m.abs() == 1 { '-' } else { '|' };
        cells.push(((prev.0 + pos.0, prev.1 + pos.1), link));
        cells.push(((2 * pos.0, 2 * pos.1), types[i + 1]));
    }

    let min_x = cells.iter().map(|&((x, _), _)| x).min()?;
    let max_x = cells.iter().map(|&((x, _), _)| x).max()?;
    let min_y = cells.iter().map(|&((_, y), _)| y).min()?;
    let max_y = cells.iter().map(|&((_, y), _)| y).max()?;

    let width = (max_x - min_x + 1) as usize;
    let height = (max_y - min_y + 1) as usize;
    let mut grid = vec![vec![' '; width]; height];
    for ((x, y), ch) in cells {
        grid[(y - min_y) as usize][(x - min_x) as usize] = ch;
    }

    let mut out = String::new();
    for row in grid.iter().rev() {
        let line: String = row.iter().collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use prospr_core::core::models::model::ModelTable;

    #[test]
    fn square_fold_renders_with_links() {
        let mut lattice = Lattice::new("HPPH", 2, ModelTable::hp()).unwrap();
        lattice.set_hash(&[1, 2, -1], false).unwrap();

        let grid = render_2d(&lattice).unwrap();
        assert_eq!(grid, "H-P\n  |\nH-P\n");
    }

    #[test]
    fn single_residue_renders_as_one_cell() {
        let lattice = Lattice::new("H", 2, ModelTable::hp()).unwrap();
        assert_eq!(render_2d(&lattice).unwrap(), "H\n");
    }

    #[test]
    fn three_dimensional_folds_are_not_rendered() {
        let lattice = Lattice::new("HPPH", 3, ModelTable::hp()).unwrap();
        assert!(render_2d(&lattice).is_none());
    }
}
