use std::cmp::Ordering;

/// A series competing to be recommended
///
/// `counter` is the number of sampled lists the title appeared in. Until
/// [`Entry::normalize`] runs, the popularity contribution to the match value
/// equals the counter.
#[derive(Debug, Clone)]
pub struct Entry {
    title: String,
    url: String,
    counter: u32,
    popularity: f64,
    bonus: f64,
}

impl Entry {
    /// Creates an entry on its first sighting
    pub fn new(title: String, url: String) -> Self {
        Self {
            title,
            url,
            counter: 1,
            popularity: 1.0,
            bonus: 0.0,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn popularity(&self) -> f64 {
        self.popularity
    }

    pub fn bonus(&self) -> f64 {
        self.bonus
    }

    /// Records another sighting of the same title
    pub fn increment(&mut self) {
        self.counter += 1;
        self.popularity = f64::from(self.counter);
    }

    /// Rescales the popularity contribution by the sample's adjusting factor.
    /// The raw counter is left untouched.
    pub fn normalize(&mut self, adjusting_factor: f64) {
        self.popularity = f64::from(self.counter) * adjusting_factor;
    }

    pub fn add_bonus(&mut self, value: f64) {
        self.bonus += value;
    }

    pub fn match_value(&self) -> f64 {
        self.popularity + self.bonus
    }
}

// Ascending by match value. Equal values order by title descending, so a
// reversed sort ranks ties alphabetically.
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.match_value()
            .total_cmp(&other.match_value())
            .then_with(|| other.title.cmp(&self.title))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}
