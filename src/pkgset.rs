// src/pkgset.rs

//! The package universe
//!
//! A [`PkgSet`] owns the package arena, its indexes and the results of the
//! last verification run. Membership changes drop the indexes and the run
//! together; [`PkgSet::setup`] rebuilds both.

use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

use crate::capreq::Capreq;
use crate::config::PkgSetConfig;
use crate::error::{Error, Result};
use crate::index::{collect_depdirs, Indexes};
use crate::package::{Package, PkgId, PkgState};
use crate::platform::PlatformCaps;
use crate::resolver::{
    CnflPkg, DepGraph, Diagnostics, Lookup, LookupContext, Problem, PrereqLoop, ReqPkg, Resolver,
    Verification,
};

pub struct PkgSet {
    config: PkgSetConfig,
    platform: Box<dyn PlatformCaps + Send + Sync>,
    packages: Vec<Arc<Package>>,
    states: Vec<PkgState>,
    depdirs: BTreeSet<String>,
    indexes: Option<Indexes>,
    run: Option<Verification>,
}

impl std::fmt::Debug for PkgSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PkgSet")
            .field("packages", &self.packages.len())
            .field("indexed", &self.indexes.is_some())
            .field("verified", &self.run.is_some())
            .finish()
    }
}

impl PkgSet {
    /// Empty set using the built-in capabilities described by `config`
    pub fn new(config: PkgSetConfig) -> Result<Self> {
        config.validate()?;
        let platform = config.platform.build()?;
        Ok(Self::with_platform(config, Box::new(platform)))
    }

    /// Empty set with a custom built-in capability oracle
    pub fn with_platform(
        config: PkgSetConfig,
        platform: Box<dyn PlatformCaps + Send + Sync>,
    ) -> Self {
        Self {
            config,
            platform,
            packages: Vec::new(),
            states: Vec::new(),
            depdirs: BTreeSet::new(),
            indexes: None,
            run: None,
        }
    }

    pub fn config(&self) -> &PkgSetConfig {
        &self.config
    }

    fn invalidate(&mut self) {
        self.indexes = None;
        self.run = None;
    }

    /// Add a package; indexes and results are dropped until the next setup
    pub fn add(&mut self, pkg: Package) -> PkgId {
        self.invalidate();
        let id = PkgId::new(self.packages.len());
        self.packages.push(Arc::new(pkg));
        self.states.push(PkgState::default());
        id
    }

    pub fn extend<I: IntoIterator<Item = Package>>(&mut self, pkgs: I) {
        for pkg in pkgs {
            self.add(pkg);
        }
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn packages(&self) -> &[Arc<Package>] {
        &self.packages
    }

    pub fn package(&self, id: PkgId) -> &Package {
        &self.packages[id.index()]
    }

    pub fn ids(&self) -> impl Iterator<Item = PkgId> + '_ {
        (0..self.packages.len()).map(PkgId::new)
    }

    /// All packages called `name`, newest first once set up
    pub fn find(&self, name: &str) -> Vec<PkgId> {
        self.ids()
            .filter(|id| self.package(*id).name() == name)
            .collect()
    }

    /// Resolve a user-supplied package reference: a full identity
    /// (`name-evr[.arch]`), or a bare name meaning its newest package
    pub fn lookup_package(&self, spec: &str) -> Result<PkgId> {
        if let Some(id) = self.ids().find(|id| {
            let pkg = self.package(*id);
            pkg.id() == spec || pkg.nevr() == spec
        }) {
            return Ok(id);
        }
        self.ids()
            .filter(|id| self.package(*id).name() == spec)
            .max_by(|a, b| self.package(*a).cmp_evr(self.package(*b)))
            .ok_or_else(|| Error::PackageNotFound(spec.to_string()))
    }

    /// Sort, deduplicate, index and verify the set
    ///
    /// Packages are ordered by name ascending then EVR descending. Exact
    /// duplicates are dropped, and with `unique_names` all but the newest
    /// package of each name. Package ids change and all marks are reset.
    pub fn setup(&mut self) -> Result<usize> {
        let before = self.packages.len();
        let mut packages = std::mem::take(&mut self.packages);
        packages.sort_by(|a, b| a.cmp_name_evr_rev(b));

        if self.config.unique_names {
            packages.dedup_by(|later, kept| later.name() == kept.name());
        } else {
            packages.dedup_by(|later, kept| {
                later.cmp_name_evr(&**kept).is_eq() && later.arch() == kept.arch()
            });
        }

        let removed = before - packages.len();
        if removed > 0 {
            info!("Removed {} duplicate packages from the set", removed);
        }

        self.states = vec![PkgState::default(); packages.len()];
        self.packages = packages;
        self.index();
        self.verify()
    }

    fn index(&mut self) {
        self.depdirs = collect_depdirs(&self.packages);
        debug!("{} directories referenced by file requirements", self.depdirs.len());

        let depdirs = if self.config.verify_file_conflicts {
            None
        } else {
            Some(&self.depdirs)
        };
        self.indexes = Some(Indexes::build(&self.packages, depdirs));
        self.run = None;
    }

    fn indexes(&self) -> Result<&Indexes> {
        self.indexes.as_ref().ok_or(Error::NotIndexed)
    }

    fn run(&self) -> Result<&Verification> {
        self.run.as_ref().ok_or(Error::NotIndexed)
    }

    /// (Re-)run verification on the indexed set; returns the error count
    pub fn verify(&mut self) -> Result<usize> {
        let indexes = self.indexes.as_ref().ok_or(Error::NotIndexed)?;
        let resolver = Resolver::new(
            &self.packages,
            indexes,
            self.platform.as_ref(),
            &self.config,
        );
        let run = resolver.verify(&mut self.states);
        let nerrors = run.error_count();
        self.run = Some(run);
        Ok(nerrors)
    }

    /// Everything derived by the last verification run
    pub fn verification(&self) -> Option<&Verification> {
        self.run.as_ref()
    }

    /// Directories referenced by file requirements
    pub fn depdirs(&self) -> &BTreeSet<String> {
        &self.depdirs
    }

    /// Packages declaring a capability called `name` (including their own
    /// name), plus the owners of `name` when it is a path or directory
    pub fn what_provides(&self, name: &str) -> Result<Vec<PkgId>> {
        let indexes = self.indexes()?;
        let mut ids: Vec<PkgId> = indexes.caps.lookup(name).unwrap_or(&[]).to_vec();
        if name.starts_with('/') {
            ids.extend(indexes.files.lookup(name));
            ids.extend(indexes.files.dir_owners(name));
            ids.sort_unstable();
            ids.dedup();
        }
        Ok(ids)
    }

    /// Packages satisfying `req`, preferred provider first
    ///
    /// An empty list means `req` is satisfied by the platform itself; an
    /// unsatisfiable requirement is an error.
    pub fn match_req(&self, req: &Capreq) -> Result<Vec<PkgId>> {
        let indexes = self.indexes()?;
        let ctx = LookupContext {
            packages: &self.packages,
            indexes,
            platform: self.platform.as_ref(),
            pm_package: &self.config.pm_package,
            strict: self.config.strict,
        };
        let mut violations = Vec::new();
        match ctx.lookup(req, &mut violations) {
            Lookup::NotFound => Err(Error::PackageNotFound(req.to_string())),
            Lookup::Found(candidates) if candidates.is_empty() => Ok(Vec::new()),
            Lookup::Found(candidates) => {
                let matches = ctx.filter_version(req, &candidates);
                if matches.is_empty() {
                    Err(Error::PackageNotFound(req.to_string()))
                } else {
                    Ok(matches)
                }
            }
        }
    }

    /// Packages with a requirement called `name`
    pub fn what_requires(&self, name: &str) -> Result<Vec<PkgId>> {
        Ok(self.indexes()?.reqs.lookup(name).unwrap_or(&[]).to_vec())
    }

    /// Packages obsoleting `name`
    pub fn what_obsoletes(&self, name: &str) -> Result<Vec<PkgId>> {
        Ok(self.indexes()?.obsoletes.lookup(name).unwrap_or(&[]).to_vec())
    }

    pub fn state(&self, id: PkgId) -> PkgState {
        self.states[id.index()]
    }

    /// Packages and graph alongside the mutable state table
    pub(crate) fn split_mut(&mut self) -> Result<(&[Arc<Package>], &DepGraph, &mut [PkgState])> {
        let run = self.run.as_ref().ok_or(Error::NotIndexed)?;
        Ok((&self.packages, &run.graph, &mut self.states))
    }

    /// Has `id` an unsatisfiable requirement, directly or transitively?
    pub fn is_tainted(&self, id: PkgId) -> bool {
        self.states[id.index()].has_unmet_deps()
    }

    pub fn is_obsoleted(&self, id: PkgId) -> bool {
        self.states[id.index()].is_obsoleted()
    }

    pub fn tainted(&self) -> Vec<PkgId> {
        self.ids().filter(|id| self.is_tainted(*id)).collect()
    }

    pub fn obsoleted(&self) -> Vec<PkgId> {
        self.ids().filter(|id| self.is_obsoleted(*id)).collect()
    }

    pub fn graph(&self) -> Result<&DepGraph> {
        Ok(&self.run()?.graph)
    }

    pub fn reqpkgs(&self, id: PkgId) -> Result<&[ReqPkg]> {
        Ok(self.graph()?.reqpkgs(id))
    }

    pub fn revreqpkgs(&self, id: PkgId) -> Result<&[PkgId]> {
        Ok(self.graph()?.revreqpkgs(id))
    }

    pub fn cnflpkgs(&self, id: PkgId) -> Result<&[CnflPkg]> {
        Ok(self.graph()?.cnflpkgs(id))
    }

    /// Install order: prerequisites first
    pub fn ordered(&self) -> Result<&[PkgId]> {
        Ok(&self.run()?.install.order)
    }

    /// Uninstall order: dependents first
    pub fn uninstall_ordered(&self) -> Result<&[PkgId]> {
        Ok(&self.run()?.uninstall.order)
    }

    pub fn loops(&self) -> Result<&[PrereqLoop]> {
        Ok(&self.run()?.install.loops)
    }

    pub fn diagnostics(&self) -> Result<&Diagnostics> {
        Ok(&self.run()?.diagnostics)
    }

    pub fn problems(&self) -> Result<&[Problem]> {
        Ok(&self.run()?.problems)
    }

    pub fn error_count(&self) -> Result<usize> {
        Ok(self.run()?.error_count())
    }
}
