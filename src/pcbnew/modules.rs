//! Reference-keyed view over a board's modules.
//!
//! [`ModuleList`] behaves like a map from reference to [`Module`] for lookup,
//! but its default iteration yields the modules themselves, in the engine's
//! placement order. The common use is "for each placed part, do X", so
//! values come first. Keys and pairs are available by name through
//! [`ModuleList::references`] and [`ModuleList::items`].

use std::fmt;
use std::iter::{Fuse, FusedIterator};

use super::engine::{NativeBoard, NativeModule};
use super::error::{BoardError, BoardResult};
use super::items::Module;

/// Non-owning view of the modules on one board.
pub struct ModuleList<'a, N: ?Sized> {
    native: &'a N,
}

impl<N: ?Sized> Clone for ModuleList<'_, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N: ?Sized> Copy for ModuleList<'_, N> {}

impl<N: NativeBoard + ?Sized> fmt::Debug for ModuleList<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.references()).finish()
    }
}

impl<'a, N: NativeBoard + ?Sized> ModuleList<'a, N> {
    pub(crate) const fn new(native: &'a N) -> Self {
        Self { native }
    }

    /// Looks up a module by reference.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotFound`] if no module has that reference.
    pub fn get(&self, reference: &str) -> BoardResult<Module<'a>> {
        self.native
            .find_module_by_reference(reference)
            .map(Module::wrap)
            .ok_or_else(|| {
                tracing::debug!(reference, "Module lookup missed");
                BoardError::not_found(reference)
            })
    }

    /// Returns true if a module has that reference.
    #[must_use]
    pub fn contains(&self, reference: &str) -> bool {
        self.native.find_module_by_reference(reference).is_some()
    }

    /// Iterates over the modules in placement order.
    ///
    /// Each call starts a fresh pass.
    #[must_use]
    pub fn iter(&self) -> Modules<'a> {
        Modules {
            inner: self.native.modules().fuse(),
        }
    }

    /// Iterates over module references in placement order.
    pub fn references(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.native.modules().map(reference_of)
    }

    /// Iterates over `(reference, module)` pairs in placement order.
    pub fn items(&self) -> impl Iterator<Item = (&'a str, Module<'a>)> + 'a {
        self.native.modules().map(keyed)
    }

    /// Number of modules currently on the board.
    #[must_use]
    pub fn len(&self) -> usize {
        self.native.module_count()
    }

    /// Returns true if the board has no modules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'a, N: NativeBoard + ?Sized> IntoIterator for ModuleList<'a, N> {
    type Item = Module<'a>;
    type IntoIter = Modules<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, N: NativeBoard + ?Sized> IntoIterator for &ModuleList<'a, N> {
    type Item = Module<'a>;
    type IntoIter = Modules<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn reference_of(module: &NativeModule) -> &str {
    &module.reference
}

fn keyed(module: &NativeModule) -> (&str, Module<'_>) {
    (&module.reference, Module::wrap(module))
}

/// Lazy iterator over a board's modules.
pub struct Modules<'a> {
    inner: Fuse<Box<dyn Iterator<Item = &'a NativeModule> + 'a>>,
}

impl fmt::Debug for Modules<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Modules").finish_non_exhaustive()
    }
}

impl<'a> Iterator for Modules<'a> {
    type Item = Module<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Module::wrap)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl FusedIterator for Modules<'_> {}
