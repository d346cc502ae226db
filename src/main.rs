//! Persisted State demo
//!
//! Runs the greeting scenario against a file store in the system temp dir:
//! type a name, rename the key, and reload from disk.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Persisted State (native) starting...");

    if let Err(e) = run() {
        log::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on the web; the host wires bindings to LocalStorage
}

#[cfg(not(target_arch = "wasm32"))]
fn run() -> Result<(), persisted_state::PersistError> {
    use std::rc::Rc;

    use persisted_state::{Binding, Scheduler, StoreConfig};

    let path = std::env::temp_dir().join("persisted-state-demo.json");
    let store: Rc<dyn persisted_state::Store> =
        Rc::from(StoreConfig::file(&path).with_namespace("demo").open()?);
    let scheduler = Scheduler::new();

    let name = scheduler.bind(Binding::new(store.clone(), "name", String::new())?);
    println!("Initial name: {:?}", name.borrow().value());

    for partial in ["K", "Ke", "Ken", "Kent"] {
        name.borrow_mut().set(partial.to_string());
    }
    let cycles = scheduler.flush()?;
    println!("Typed 'Kent' in {} cycle(s)", cycles);

    name.borrow_mut().set_key("alias");
    name.borrow_mut().update(|n| n.chars().take(1).collect());
    scheduler.flush()?;
    println!(
        "Moved to key {:?} with value {:?}",
        name.borrow().key(),
        name.borrow().value()
    );

    drop(name);
    let reloaded: Binding<String, _> = Binding::new(store.clone(), "alias", String::new())?;
    println!("Reloaded from {}: {:?}", path.display(), reloaded.value());
    println!("Stale key present: {}", store.get("name")?.is_some());

    Ok(())
}
