//! Range specifications and the identifier sequences they resolve to

use crate::range::codepoint::{coerce_codepoint, Codepoint};
use crate::store::ArtifactStore;
use crate::RangeError;
use std::ops::RangeInclusive;

/// An inclusive codepoint domain `[lower, upper]`
///
/// A domain with `lower > upper` is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Domain {
    pub lower: Codepoint,
    pub upper: Codepoint,
}

impl Domain {
    /// Creates a new domain
    pub fn new(lower: u32, upper: u32) -> Self {
        Self {
            lower: Codepoint(lower),
            upper: Codepoint(upper),
        }
    }

    /// Returns true if the domain contains no codepoints
    pub fn is_empty(&self) -> bool {
        self.lower > self.upper
    }

    /// Returns true if `codepoint` lies within the domain
    pub fn contains(&self, codepoint: Codepoint) -> bool {
        self.lower <= codepoint && codepoint <= self.upper
    }

    /// Iterates every codepoint of the domain in ascending order
    pub fn iter(&self) -> Identifiers {
        Identifiers::range(self.lower, self.upper)
    }
}

/// A parsed range specification
///
/// The specification is parsed once per invocation. Resolving it to an
/// [`Identifiers`] sequence happens per run, so that a resumed range picks up
/// whatever the store contains at that moment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeSpec {
    /// Explicit codepoints, in the order given (duplicates preserved)
    List(Vec<Codepoint>),

    /// Inclusive bounds; empty if `lower > upper`
    Bounded { lower: Codepoint, upper: Codepoint },

    /// Continue after the highest codepoint already in the store
    Resume,
}

impl RangeSpec {
    /// Parses a range specification string
    ///
    /// # Rules
    ///
    /// | Input | Result |
    /// |-------|--------|
    /// | absent or blank | `Resume` |
    /// | contains `,` | `List`, every token must coerce |
    /// | contains `..` | `Bounded`, a side that fails to coerce takes the domain's bound |
    /// | anything else | `Bounded` over that single codepoint |
    ///
    /// # Arguments
    ///
    /// * `spec` - The user-supplied specification, if any
    /// * `domain` - The default domain supplying missing bounds
    ///
    /// # Examples
    ///
    /// ```
    /// use koohii_mirror::range::{Codepoint, Domain, RangeSpec};
    ///
    /// let domain = Domain::new(100, 200);
    /// let spec = RangeSpec::parse(Some("a.."), domain).unwrap();
    /// assert_eq!(
    ///     spec,
    ///     RangeSpec::Bounded { lower: Codepoint(97), upper: Codepoint(200) }
    /// );
    /// ```
    pub fn parse(spec: Option<&str>, domain: Domain) -> Result<Self, RangeError> {
        let spec = match spec.map(str::trim) {
            Some(s) if !s.is_empty() => s,
            _ => return Ok(Self::Resume),
        };

        if spec.contains(',') {
            let codepoints = spec
                .split(',')
                .map(|token| {
                    coerce_codepoint(token)
                        .ok_or_else(|| RangeError::InvalidToken(token.trim().to_string()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Self::List(codepoints));
        }

        if let Some((lower, upper)) = spec.split_once("..") {
            return Ok(Self::Bounded {
                lower: coerce_codepoint(lower).unwrap_or(domain.lower),
                upper: coerce_codepoint(upper).unwrap_or(domain.upper),
            });
        }

        let single = coerce_codepoint(spec)
            .ok_or_else(|| RangeError::InvalidToken(spec.to_string()))?;
        Ok(Self::Bounded {
            lower: single,
            upper: single,
        })
    }

    /// Resolves this specification to a fresh identifier sequence
    ///
    /// `Resume` enumerates `store` and continues after the highest stored
    /// codepoint, never starting below `domain.lower`. An empty or unreadable
    /// store resumes with the whole domain.
    pub fn resolve<A>(&self, domain: Domain, store: &A) -> Identifiers
    where
        A: ArtifactStore + ?Sized,
    {
        match self {
            Self::List(codepoints) => Identifiers::list(codepoints.clone()),
            Self::Bounded { lower, upper } => Identifiers::range(*lower, *upper),
            Self::Resume => resume_from(domain, store),
        }
    }

    /// Returns true if this specification is derived from the store
    pub fn is_resume(&self) -> bool {
        matches!(self, Self::Resume)
    }
}

fn resume_from<A>(domain: Domain, store: &A) -> Identifiers
where
    A: ArtifactStore + ?Sized,
{
    let stored = match store.list_identifiers() {
        Ok(stored) => stored,
        Err(e) => {
            tracing::warn!("Could not read artifact store, resuming from the start: {}", e);
            return domain.iter();
        }
    };

    match stored.iter().max() {
        Some(highest) => {
            tracing::info!("Highest stored codepoint is {}", highest);
            match highest.next() {
                Some(next) => Identifiers::range(next.max(domain.lower), domain.upper),
                None => Identifiers::empty(),
            }
        }
        None => {
            tracing::info!("Artifact store is empty, starting from {}", domain.lower);
            domain.iter()
        }
    }
}

/// A finite, lazily produced sequence of codepoints
///
/// Cloning yields an independent sequence at the same position.
#[derive(Debug, Clone)]
pub struct Identifiers {
    inner: Inner,
}

#[derive(Debug, Clone)]
enum Inner {
    List(std::vec::IntoIter<Codepoint>),
    Range(RangeInclusive<u32>),
}

impl Identifiers {
    /// Sequence over an explicit list
    pub fn list(codepoints: Vec<Codepoint>) -> Self {
        Self {
            inner: Inner::List(codepoints.into_iter()),
        }
    }

    /// Sequence over `[lower, upper]`; empty when `lower > upper`
    pub fn range(lower: Codepoint, upper: Codepoint) -> Self {
        Self {
            inner: Inner::Range(lower.value()..=upper.value()),
        }
    }

    /// The empty sequence
    pub fn empty() -> Self {
        Self::list(Vec::new())
    }
}

impl Iterator for Identifiers {
    type Item = Codepoint;

    fn next(&mut self) -> Option<Codepoint> {
        match &mut self.inner {
            Inner::List(iter) => iter.next(),
            Inner::Range(range) => range.next().map(Codepoint),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            Inner::List(iter) => iter.size_hint(),
            Inner::Range(range) => range.size_hint(),
        }
    }
}
