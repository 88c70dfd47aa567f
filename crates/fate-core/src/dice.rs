//! Fate dice: four independent trits in {-1, 0, +1}, plus the 1-bit draw
//! used for consensus tie-breaks. Deterministic under a fixed seed.

/// Splitmix-style seed-mixed generator; no OS entropy, so a
/// (seed, draw-sequence) pair always replays identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FateDice {
    state: u64,
}

/// One 4dF roll: the per-die faces in trial order, their sum, and the
/// rendered glyph sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceRoll {
    pub faces: [i8; 4],
    pub total: i64,
    pub glyphs: String,
}

fn die_glyph(face: i8) -> &'static str {
    match face {
        -1 => "[-]",
        1 => "[+]",
        _ => "[ ]",
    }
}

impl FateDice {
    pub fn seeded(seed: u64) -> Self {
        Self {
            state: seed ^ 0x9E37_79B9_7F4A_7C15,
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut mixed = self.state;
        mixed = (mixed ^ (mixed >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        mixed = (mixed ^ (mixed >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        mixed ^ (mixed >> 31)
    }

    fn next_trit(&mut self) -> i8 {
        (self.next_u64() % 3) as i8 - 1
    }

    pub fn roll(&mut self) -> DiceRoll {
        let mut faces = [0_i8; 4];
        let mut glyphs = Vec::with_capacity(4);
        for face in faces.iter_mut() {
            *face = self.next_trit();
            glyphs.push(die_glyph(*face));
        }
        let total = faces.iter().map(|face| i64::from(*face)).sum();
        DiceRoll {
            faces,
            total,
            glyphs: glyphs.join(" "),
        }
    }

    /// Uniform 1-bit draw. True reads as heads.
    pub fn coin_flip(&mut self) -> bool {
        self.next_u64() & 1 == 1
    }
}
