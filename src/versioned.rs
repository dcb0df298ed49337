// -------------------------------------------------------------------
// Versioned
// -------------------------------------------------------------------

/// A value whose every replacement bumps a version counter.
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    version: u64,
    data: T,
}

impl<T> Versioned<T> {
    pub fn new(data: T) -> Self {
        Self { version: 0, data }
    }
    pub fn get(&self) -> &T {
        &self.data
    }
    pub fn set(&mut self, data: T) {
        self.data = data;
        self.version = self.version.wrapping_add(1);
    }
    pub fn version(&self) -> u64 {
        self.version
    }
}

// -------------------------------------------------------------------
// Memoized
// -------------------------------------------------------------------

pub struct Memoized<S, K, V> {
    version: u64,
    cached: Option<(K, V)>,
    get_key: Box<dyn Fn(&S) -> K>,
    calc: Box<dyn Fn(&S) -> V>,
}

impl<S, K, V> Memoized<S, K, V>
where
    K: PartialEq,
{
    pub fn new(
        get_key: impl Fn(&S) -> K + 'static,
        calc: impl Fn(&S) -> V + 'static,
    ) -> Self {
        Self {
            version: 0,
            cached: None,
            get_key: Box::new(get_key),
            calc: Box::new(calc),
        }
    }

    /// Recompute only if the key changed; return the cached value.
    pub fn get<'a>(&'a mut self, source: &S) -> &'a V {
        let key = (self.get_key)(source);
        let entry = match self.cached.take() {
            Some((last_key, value)) if last_key == key => (last_key, value),
            _ => {
                let value = (self.calc)(source);
                self.version = self.version.wrapping_add(1);
                (key, value)
            }
        };
        &self.cached.insert(entry).1
    }

    /// Increments each time the value is recomputed.
    pub fn version(&self) -> u64 {
        self.version
    }
}
