// tests/properties.rs

//! Invariants that must hold for any package set.

mod common;

use common::{cap, id, pkg, setup};
use rpmgraph::mark::{dependents_closure, mark_with_deps};
use rpmgraph::{Package, PkgId, PkgSet};

/// A mixed universe: versioned requirements, shared providers, a broken
/// chain and multilib pairs
fn universe() -> Vec<Package> {
    vec![
        pkg("app", "1.0-1")
            .requires(cap("libssl >= 3.0"))
            .requires(cap("mta"))
            .requires(cap("app")),
        pkg("libssl", "1.1.1-5"),
        pkg("libssl", "3.0.7-2"),
        pkg("libssl", "3.2.0-1"),
        pkg("postfix", "3.8-1").provides(cap("mta")).requires(cap("libssl >= 1.1")),
        pkg("sendmail", "8.17-1").provides(cap("mta")),
        pkg("exim", "4.97-1").provides(cap("mta")),
        pkg("broken", "1-1").requires(cap("libmissing.so.9")),
        pkg("mid", "1-1").requires(cap("broken")),
        pkg("top", "1-1").requires(cap("mid")),
        pkg("top-plugin", "1-1").requires(cap("top >= 1")),
        pkg("glibc", "2.39-1")
            .with_arch("x86_64")
            .conflicts(cap("glibc"))
            .file("/usr/lib/locale/C.utf8/LC_CTYPE"),
        pkg("glibc", "2.39-1")
            .with_arch("i686")
            .conflicts(cap("glibc"))
            .file("/usr/lib/locale/C.utf8/LC_CTYPE"),
    ]
}

fn all_ids(ps: &PkgSet) -> Vec<PkgId> {
    ps.ids().collect()
}

#[test]
fn test_matches_satisfy_version_constraint() {
    let ps = setup(universe());
    for owner in all_ids(&ps) {
        let pkg = ps.package(owner);
        for edge in ps.reqpkgs(owner).unwrap() {
            let req = edge.req(pkg);
            for target in edge.target().all() {
                assert!(
                    ps.package(target).matches_req(req, true),
                    "{} does not satisfy {} of {}",
                    ps.package(target).id(),
                    req,
                    pkg.id()
                );
            }
        }
    }

    let app = id(&ps, "app");
    let ssl_old = id(&ps, "libssl-1.1.1-5");
    assert!(ps
        .reqpkgs(app)
        .unwrap()
        .iter()
        .all(|e| !e.target().all().any(|t| t == ssl_old)));
}

#[test]
fn test_no_package_provides_for_itself() {
    let ps = setup(universe());
    for owner in all_ids(&ps) {
        for edge in ps.reqpkgs(owner).unwrap() {
            assert!(
                !edge.target().all().any(|t| t == owner),
                "{} resolved to itself",
                ps.package(owner).id()
            );
        }
    }
    // "app" requires its own name and is not tainted for it
    assert!(!ps.diagnostics().unwrap().contains_key("app-1.0-1"));
}

#[test]
fn test_taint_is_closed_under_dependents() {
    let ps = setup(universe());
    let tainted = ps.tainted();
    assert_eq!(tainted.len(), 4);

    for t in &tainted {
        for dependent in ps.revreqpkgs(*t).unwrap() {
            assert!(
                ps.is_tainted(*dependent),
                "{} depends on tainted {} but is not tainted",
                ps.package(*dependent).id(),
                ps.package(*t).id()
            );
        }
        for dependent in dependents_closure(&ps, *t).unwrap() {
            assert!(ps.is_tainted(dependent));
        }
    }
    assert!(!ps.is_tainted(id(&ps, "app")));
}

#[test]
fn test_multilib_pair_never_conflicts() {
    let ps = setup(universe());
    let x86 = id(&ps, "glibc-2.39-1.x86_64");
    let i686 = id(&ps, "glibc-2.39-1.i686");
    assert!(ps.cnflpkgs(x86).unwrap().is_empty());
    assert!(ps.cnflpkgs(i686).unwrap().is_empty());
    assert!(!ps.problems().unwrap().iter().any(|p| !p.is_error()));
}

#[test]
fn test_multi_edge_shape() {
    let ps = setup(universe());
    let app = id(&ps, "app");
    let pkg = ps.package(app);

    for edge in ps.reqpkgs(app).unwrap() {
        let req = edge.req(pkg);
        let matches: Vec<PkgId> = all_ids(&ps)
            .into_iter()
            .filter(|m| *m != app && ps.package(*m).matches_req(req, true))
            .collect();

        if matches.len() > 1 {
            assert!(edge.is_multi());
            assert_eq!(edge.target().alternates().len(), matches.len() - 1);

            let best = matches
                .iter()
                .copied()
                .max_by(|a, b| ps.package(*a).cmp_name_evr(ps.package(*b)))
                .unwrap();
            assert_eq!(edge.primary(), best);
        } else {
            assert!(!edge.is_multi());
        }
    }

    let mta_edge = ps
        .reqpkgs(app)
        .unwrap()
        .iter()
        .find(|e| e.req(pkg).name() == "mta")
        .unwrap();
    assert_eq!(mta_edge.primary(), id(&ps, "sendmail"));
    assert_eq!(mta_edge.target().alternates().len(), 2);
}

#[test]
fn test_verification_is_idempotent() {
    let mut ps = setup(universe());
    let diagnostics = ps.diagnostics().unwrap().clone();
    let errors = ps.error_count().unwrap();
    let order = ps.ordered().unwrap().to_vec();

    assert_eq!(ps.verify().unwrap(), errors);
    assert_eq!(ps.diagnostics().unwrap(), &diagnostics);
    assert_eq!(ps.ordered().unwrap(), order.as_slice());

    assert_eq!(ps.setup().unwrap(), errors);
    assert_eq!(ps.diagnostics().unwrap(), &diagnostics);
}

#[test]
fn test_order_is_a_permutation() {
    let ps = setup(universe());
    let mut order = ps.ordered().unwrap().to_vec();
    order.sort_unstable();
    assert_eq!(order, all_ids(&ps));
}

#[test]
fn test_marking_pulls_preferred_providers() {
    let mut ps = setup(universe());
    let app = id(&ps, "app");
    let outcome = mark_with_deps(&mut ps, &[app]).unwrap();

    assert!(ps.state(id(&ps, "libssl-3.2.0-1")).is_dep_marked());
    assert!(ps.state(id(&ps, "sendmail")).is_dep_marked());
    assert!(!ps.state(id(&ps, "postfix")).is_marked());
    assert!(outcome.tainted.is_empty());
}
