//! Game code generation

use rand::Rng;
use shared::{GameCode, GAME_CODE_ALPHABET, GAME_CODE_LEN};

/// Draw a random six-symbol code from the unambiguous alphabet.
///
/// Uniqueness is not checked here; the store rejects a taken code and the
/// caller draws again.
pub fn generate_game_code() -> GameCode {
    let mut rng = rand::rng();
    let mut indices = [0usize; GAME_CODE_LEN];
    for index in indices.iter_mut() {
        *index = rng.random_range(0..GAME_CODE_ALPHABET.len());
    }
    GameCode::from_alphabet_indices(indices)
}
