use std::path::PathBuf;

use kvm_core::vm::Register;
use kvm_core::{BoxedValue, ElementKind, KvmConfig, KvmError, ProgramLoader, VirtualMachine};

fn data(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data").join(name)
}

fn value(vm: &VirtualMachine, reg: u16) -> BoxedValue {
    match vm.register(reg).expect("register out of range") {
        Register::Value(v) => v,
        other => panic!("v{} holds {:?}", reg, other),
    }
}

#[test]
fn grid_listing_runs_to_completion() {
    let program = ProgramLoader::load_file(&data("grid.kvm")).expect("load failed");
    let mut vm = VirtualMachine::new(KvmConfig::new(), program);
    vm.execute().expect("execution failed");

    assert!(vm.is_halted());
    assert_eq!(value(&vm, 11), BoxedValue::Int(9));
    assert_eq!(value(&vm, 12), BoxedValue::Int(2));
    // the row loaded back is the very row that was stored
    assert_eq!(value(&vm, 10), value(&vm, 4));

    let outer = value(&vm, 1).as_reference().flatten().unwrap();
    assert_eq!(vm.heap().array(Some(outer)).unwrap().kind(), ElementKind::Reference);
    assert_eq!(vm.heap().live_objects(), 3);
}

#[test]
fn int_into_byte_array_is_a_kind_mismatch() {
    let program = ProgramLoader::load_file(&data("bad_store.kvm")).expect("load failed");
    let mut vm = VirtualMachine::new(KvmConfig::new(), program);
    match vm.execute() {
        Err(KvmError::KindMismatch { expected, actual }) => {
            assert_eq!(expected, ElementKind::Byte);
            assert_eq!(actual, ElementKind::Int);
        }
        other => panic!("unexpected result: {:?}", other),
    }
    let array = value(&vm, 1).as_reference().flatten().unwrap();
    assert_eq!(vm.heap().array_get(Some(array), 0).unwrap(), BoxedValue::Byte(0));
}

#[test]
fn missing_listing_is_io_error() {
    assert!(matches!(
        ProgramLoader::load_file(&data("does_not_exist.kvm")),
        Err(KvmError::Io(_))
    ));
}

#[test]
fn array_too_large_for_config() {
    let mut config = KvmConfig::new();
    config.max_array_length = 16;
    let program = ProgramLoader::load("const v0, int:17\nnew-array v1, v0, [D").unwrap();
    let mut vm = VirtualMachine::new(config, program);
    assert!(matches!(vm.execute(), Err(KvmError::ArrayTooLarge { length: 17, max: 16 })));
}

#[test]
fn negative_new_array_size() {
    let program = ProgramLoader::load("const v0, int:-3\nnew-array v1, v0, [S").unwrap();
    let mut vm = VirtualMachine::new(KvmConfig::new(), program);
    assert!(matches!(vm.execute(), Err(KvmError::NegativeArraySize(-3))));
}

#[test]
fn absurdly_deep_descriptor_is_rejected() {
    let source = format!("const v0, int:1\nnew-array v1, v0, {}I", "[".repeat(2_000_000));
    let program = ProgramLoader::load(&source).unwrap();
    let mut vm = VirtualMachine::new(KvmConfig::new(), program);
    assert!(matches!(vm.execute(), Err(KvmError::InvalidDescriptor(_))));
    assert_eq!(vm.heap().live_objects(), 0);
}
