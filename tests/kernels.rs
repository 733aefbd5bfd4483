use std::collections::HashSet;
use std::fs;
use std::path::Path;

use vw_ephem_spice::kernels::{
    KERNEL_CATALOG, KernelKind, LOCAL_SPICE_DIR, render_meta_kernel, write_meta_kernel,
};

#[test]
fn catalog_entries_are_unique_and_local() {
    let names: HashSet<&str> = KERNEL_CATALOG.iter().map(|k| k.filename).collect();
    assert_eq!(names.len(), KERNEL_CATALOG.len());

    for descriptor in KERNEL_CATALOG {
        assert!(descriptor.url.starts_with("https://naif.jpl.nasa.gov/"));
        assert!(descriptor.url.ends_with(descriptor.filename));
        assert_eq!(
            descriptor.local_path(),
            Path::new(LOCAL_SPICE_DIR).join(descriptor.filename)
        );
    }
    assert!(KERNEL_CATALOG.iter().any(|k| k.kind == KernelKind::Lsk));
    assert!(KERNEL_CATALOG.iter().any(|k| k.kind == KernelKind::Fk));
}

#[test]
fn meta_kernel_lists_kernels_in_order() {
    let text = render_meta_kernel(&["data/spice/naif0012.tls", "data/spice/de440s.bsp"]);
    assert!(text.starts_with("KPL/MK"));
    let lsk = text.find("'data/spice/naif0012.tls'").expect("lsk listed");
    let spk = text.find("'data/spice/de440s.bsp'").expect("spk listed");
    assert!(lsk < spk);
    assert!(text.contains("KERNELS_TO_LOAD = ("));
}

#[test]
fn meta_kernel_is_written_with_parent_directories() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("spice").join("generic.tm");
    write_meta_kernel(&path, &[Path::new("naif0012.tls")]).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("'naif0012.tls'"));
    assert!(text.trim_end().ends_with("\\begintext"));
}
