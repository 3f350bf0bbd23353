use game_types::GuessFeedback;

/// Number of digits in a target or guess.
pub const DIGIT_COUNT: usize = 3;

pub type Digits = [u8; DIGIT_COUNT];

/// Decimal decomposition of a number into its last three digits, most
/// significant first. Values below 100 are zero-padded.
pub fn digits_of(number: u16) -> Digits {
    [
        ((number / 100) % 10) as u8,
        ((number / 10) % 10) as u8,
        (number % 10) as u8,
    ]
}

/// Compare a guess against the target, Mastermind style.
///
/// Exact matches are consumed first so a repeated digit is never counted against
/// more target slots than the target actually has.
pub fn evaluate_guess(guess: &Digits, target: &Digits) -> GuessFeedback {
    let mut guess_used = [false; DIGIT_COUNT];
    let mut target_used = [false; DIGIT_COUNT];
    let mut correct = 0u8;
    let mut misplaced = 0u8;

    // First pass: right digit, right position
    for i in 0..DIGIT_COUNT {
        if guess[i] == target[i] {
            correct += 1;
            guess_used[i] = true;
            target_used[i] = true;
        }
    }

    // Second pass: remaining digits present elsewhere, first free slot only
    for (i, digit) in guess.iter().enumerate() {
        if guess_used[i] {
            continue;
        }
        let slot = (0..DIGIT_COUNT).find(|&j| !target_used[j] && target[j] == *digit);
        if let Some(j) = slot {
            misplaced += 1;
            target_used[j] = true;
        }
    }

    GuessFeedback {
        correct,
        misplaced,
        is_win: correct as usize == DIGIT_COUNT,
    }
}
