use std::fmt;

use rand::Rng;

use crate::CellOffset;

/// A two dimensional toroidal field of cells.
///
/// Reads wrap around both edges, so every `(x, y)` names a cell. Writes must be in bounds.
#[derive(Clone, PartialEq, Eq)]
pub struct Field {
    /// The cell buffer, row major
    cb: Vec<bool>,

    /// Width of the field
    w: usize,

    /// Height of the field
    h: usize,
}

impl Field {
    /// Create an empty field, every cell dead
    pub fn new(w: usize, h: usize) -> Self {
        assert!(w > 0, "field width must be positive");
        assert!(h > 0, "field height must be positive");

        Self {
            cb: vec![false; w * h],
            w,
            h,
        }
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    /// Sets the state of a single cell. No wrapping is done here.
    pub fn set(&mut self, x: usize, y: usize, alive: bool) {
        assert!(x < self.w, "x is out of bounds");
        assert!(y < self.h, "y is out of bounds");

        let i = self.xy_from(x, y);

        self.cb[i] = alive;
    }

    /// Reports whether the cell at `(x, y)` is alive.
    ///
    /// Coordinates outside of the field wrap toroidally. For instance, `x = -1` is the same cell
    /// as `x = w - 1`.
    pub fn alive(&self, x: CellOffset, y: CellOffset) -> bool {
        let x = x.rem_euclid(self.w as CellOffset) as usize;
        let y = y.rem_euclid(self.h as CellOffset) as usize;

        self.cb[self.xy_from(x, y)]
    }

    /// Kill every cell
    pub fn clear(&mut self) {
        self.cb.fill(false);
    }

    /// Clears the field, then turns on `floor(w * h * density)` cells picked uniformly at random.
    ///
    /// Picks may land on the same cell twice, so the resulting population can be lower than the
    /// number of picks.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R, density: f64) {
        self.clear();

        let picks = ((self.w * self.h) as f64 * density) as usize;

        for _ in 0..picks {
            let x = rng.gen_range(0..self.w);
            let y = rng.gen_range(0..self.h);

            self.set(x, y, true);
        }
    }

    /// State of the cell at `(x, y)` in the next generation
    pub fn next(&self, x: CellOffset, y: CellOffset) -> bool {
        // reduce first so the neighbor offsets can't overflow
        let x = x.rem_euclid(self.w as CellOffset);
        let y = y.rem_euclid(self.h as CellOffset);

        let mut neighbors = 0;

        for dy in -1..=1 {
            for dx in -1..=1 {
                if (dx, dy) != (0, 0) && self.alive(x + dx, y + dy) {
                    neighbors += 1;
                }
            }
        }

        // 3 neighbors: on, 2 neighbors: unchanged, otherwise: off
        neighbors == 3 || (neighbors == 2 && self.alive(x, y))
    }

    /// Number of live cells
    pub fn population(&self) -> usize {
        self.cb.iter().filter(|&&c| c).count()
    }

    fn xy_from(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.cb.chunks(self.w).enumerate() {
            if y > 0 {
                writeln!(f)?;
            }

            for &c in row {
                f.write_str(if c { "#" } else { "." })?;
            }
        }

        Ok(())
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Field {}x{}", self.w, self.h)?;
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::Field;
    use crate::CellOffset;

    /// The 8 neighbors of `(1, 1)`, which are all distinct cells on a 3x3 torus
    const NEIGHBORS: [(usize, usize); 8] = [
        (0, 0),
        (1, 0),
        (2, 0),
        (0, 1),
        (2, 1),
        (0, 2),
        (1, 2),
        (2, 2),
    ];

    #[test]
    fn new_field_is_dead() {
        let field = Field::new(4, 3);

        assert_eq!(field.population(), 0);
        assert_eq!((field.width(), field.height()), (4, 3));
    }

    #[test]
    #[should_panic(expected = "x is out of bounds")]
    fn set_does_not_wrap() {
        let mut field = Field::new(4, 3);

        field.set(4, 0, true);
    }

    #[test]
    fn alive_wraps_both_edges() {
        let mut field = Field::new(5, 4);
        field.set(4, 3, true);

        assert!(field.alive(-1, -1));
        assert!(field.alive(4, 3));
        assert!(field.alive(9, 7));
        assert!(field.alive(-6, -5));
        assert!(!field.alive(0, 0));
    }

    #[test]
    fn rule_table() {
        for n in 0..=8 {
            for was_alive in [false, true] {
                let mut field = Field::new(3, 3);
                field.set(1, 1, was_alive);

                for &(x, y) in &NEIGHBORS[..n] {
                    field.set(x, y, true);
                }

                let want = n == 3 || (n == 2 && was_alive);

                assert_eq!(
                    field.next(1, 1),
                    want,
                    "{n} neighbors, alive = {was_alive}"
                );
            }
        }
    }

    #[test]
    fn next_at_extreme_coordinates() {
        let mut field = Field::new(5, 5);
        let (x, y) = (
            isize::MAX.rem_euclid(5) as usize,
            isize::MIN.rem_euclid(5) as usize,
        );

        // vertical blinker through (x, y)
        field.set(x, (y + 4) % 5, true);
        field.set(x, y, true);
        field.set(x, (y + 1) % 5, true);

        // center survives, the cell beside it is born, the ends die
        assert!(field.next(isize::MAX, isize::MIN));
        assert!(field.next(isize::MAX - 1, isize::MIN));
        assert!(!field.next(isize::MAX, isize::MIN + 4));
        assert_eq!(
            field.next(isize::MIN, isize::MAX),
            field.next(x as CellOffset, y as CellOffset)
        );
    }

    #[test]
    fn clear_kills_everything() {
        let mut field = Field::new(6, 6);
        field.randomize(&mut StdRng::seed_from_u64(7), 0.5);
        assert!(field.population() > 0);

        field.clear();

        assert_eq!(field.population(), 0);
    }

    #[test]
    fn randomize_is_bounded_by_picks() {
        let mut field = Field::new(80, 30);
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..10 {
            field.randomize(&mut rng, 0.25);

            let population = field.population();
            assert!(population > 0);
            assert!(population <= 80 * 30 / 4);
        }
    }

    #[test]
    fn randomize_clears_first() {
        let mut field = Field::new(10, 10);
        for y in 0..10 {
            for x in 0..10 {
                field.set(x, y, true);
            }
        }

        field.randomize(&mut StdRng::seed_from_u64(1), 0.0);

        assert_eq!(field.population(), 0);
    }

    #[test]
    fn display_blinker() {
        let mut field = Field::new(5, 5);
        field.set(1, 2, true);
        field.set(2, 2, true);
        field.set(3, 2, true);

        insta::assert_snapshot!(field.to_string(), @r"
        .....
        .....
        .###.
        .....
        .....
        ");
    }

    proptest! {
        #[test]
        fn alive_is_periodic(
            w in 1usize..12,
            h in 1usize..12,
            seed in any::<u64>(),
            x in -1000isize..1000,
            y in -1000isize..1000,
            k in -50isize..50,
            m in -50isize..50
        ) {
            let mut field = Field::new(w, h);
            field.randomize(&mut StdRng::seed_from_u64(seed), 0.5);

            let (kw, mh) = (k * w as CellOffset, m * h as CellOffset);

            prop_assert_eq!(field.alive(x, y), field.alive(x + kw, y + mh));
        }

        #[test]
        fn next_depends_on_neighborhood_only(seed in any::<u64>(), x in -20isize..20, y in -20isize..20) {
            let mut field = Field::new(7, 5);
            field.randomize(&mut StdRng::seed_from_u64(seed), 0.4);

            let mut neighbors = 0;
            for dy in -1..=1 {
                for dx in -1..=1 {
                    if (dx, dy) != (0, 0) && field.alive(x + dx, y + dy) {
                        neighbors += 1;
                    }
                }
            }

            let want = match neighbors {
                2 => field.alive(x, y),
                3 => true,
                _ => false,
            };

            prop_assert_eq!(field.next(x, y), want);
        }
    }
}
