/// Fixed-length numeric code entry.
///
/// Models the OTP input widget's behavior without any rendering concern: one
/// slot per digit, a cursor that auto-advances as digits are typed, paste
/// fill, and a completion signal surfaced exactly once when every slot is
/// filled. The signal does not fire again until the entry is cleared and
/// refilled.
#[derive(Debug)]
pub struct OtpEntry {
    digits: Vec<Option<char>>,
    cursor: usize,
    completed: bool,
}

impl OtpEntry {
    /// Creates an empty entry with `len` digit slots.
    pub fn new(len: usize) -> Self {
        Self {
            digits: vec![None; len],
            cursor: 0,
            completed: false,
        }
    }

    /// The slot the next digit will land in.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The digits entered so far, in slot order.
    pub fn value(&self) -> String {
        self.digits.iter().flatten().collect()
    }

    /// Whether every slot is filled.
    pub fn is_full(&self) -> bool {
        self.digits.iter().all(Option::is_some)
    }

    /// Enters one digit at the cursor and advances it.
    ///
    /// Non-digit input is ignored. Returns the complete code exactly once,
    /// on the keypress that fills the last empty slot.
    pub fn push(&mut self, c: char) -> Option<String> {
        if !c.is_ascii_digit() || self.cursor >= self.digits.len() {
            return None;
        }

        self.digits[self.cursor] = Some(c);
        self.cursor += 1;

        self.completion()
    }

    /// Fills slots from pasted text, starting at the first slot.
    ///
    /// Non-digit characters are skipped, surplus digits are dropped. Returns
    /// the complete code exactly once if the paste fills every slot.
    pub fn paste(&mut self, text: &str) -> Option<String> {
        let mut slot = 0;
        for c in text.chars().filter(char::is_ascii_digit) {
            if slot >= self.digits.len() {
                break;
            }
            self.digits[slot] = Some(c);
            slot += 1;
        }
        self.cursor = slot.min(self.digits.len());

        self.completion()
    }

    /// Clears the slot before the cursor and moves the cursor back.
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.digits[self.cursor] = None;
        }
    }

    /// Empties every slot and re-arms the completion signal.
    pub fn clear(&mut self) {
        self.digits.fill(None);
        self.cursor = 0;
        self.completed = false;
    }

    fn completion(&mut self) -> Option<String> {
        if self.is_full() && !self.completed {
            self.completed = true;
            Some(self.value())
        } else {
            None
        }
    }
}
