//! Tests for single-qubit frames and the gate conjugation rules.

use qstab_core::{
    ConstantOracle, MeasurementResult, ObservableProduct, QubitState, ScriptedOracle, Sign,
    StabError, VarId,
};

fn var(id: &str) -> ObservableProduct {
    ObservableProduct::var(id)
}

fn neg(p: &ObservableProduct) -> ObservableProduct {
    p.times_sign(Sign::Minus)
}

fn qubit(x: ObservableProduct, z: ObservableProduct, sign_y: Sign) -> QubitState {
    QubitState::new(x, z, sign_y).unwrap()
}

fn xz() -> QubitState {
    qubit(var("x"), var("z"), Sign::Plus)
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

#[test]
fn construct_keeps_fields() {
    let q = qubit(var("x"), var("z"), Sign::Minus);
    assert_eq!(q.obs_x(), &var("x"));
    assert_eq!(q.obs_z(), &var("z"));
    assert_eq!(q.sign_y(), Sign::Minus);

    let a = ObservableProduct::new(["a", "aa"], Sign::Minus);
    let q2 = qubit(a.clone(), var("b"), Sign::Plus);
    assert_eq!(q2.obs_x(), &a);
    assert_eq!(q2.sign_y(), Sign::Plus);
}

#[test]
fn construct_rejects_two_constant_axes() {
    let err = QubitState::new(
        ObservableProduct::one(),
        ObservableProduct::constant(Sign::Minus),
        Sign::Plus,
    )
    .unwrap_err();
    assert_eq!(
        err,
        StabError::TrivialQubit {
            x: "1".to_string(),
            z: "-1".to_string(),
        }
    );

    // One constant axis is a definite state, which is fine.
    assert!(QubitState::new(var("x"), ObservableProduct::one(), Sign::Plus).is_ok());
}

#[test]
fn obs_y_is_derived() {
    let (x, z) = (var("x"), var("z"));
    assert_eq!(qubit(x.clone(), z.clone(), Sign::Plus).obs_y(), x.times(&z));
    assert_eq!(qubit(x.clone(), z.clone(), Sign::Minus).obs_y(), neg(&x.times(&z)));
    assert_eq!(qubit(x.clone(), neg(&z), Sign::Minus).obs_y(), x.times(&z));
}

#[test]
fn equality_and_display() {
    let t = ObservableProduct::constant(Sign::Minus);
    let (x, y, z) = (var("x"), var("y"), var("z"));
    let a = qubit(x.clone(), z.clone(), Sign::Minus);

    assert_eq!(a, qubit(x.clone(), z.clone(), Sign::Minus));
    assert_ne!(a, qubit(z.clone(), x.clone(), Sign::Minus));
    assert_ne!(a, qubit(x.clone(), z.clone(), Sign::Plus));
    assert_ne!(a, qubit(x.clone(), y.clone(), Sign::Minus));
    assert_ne!(a, qubit(y, z.clone(), Sign::Minus));
    assert_ne!(a, qubit(x.times(&t), z, Sign::Minus));

    let z2 = ObservableProduct::new(["a", "z"], Sign::Minus);
    assert_eq!(qubit(x.clone(), z2.clone(), Sign::Plus).to_string(), "Q(X=x, Z=-a*z, Y=X*Z)");
    assert_eq!(qubit(x, z2, Sign::Minus).to_string(), "Q(X=x, Z=-a*z, Y=-X*Z)");
}

// ---------------------------------------------------------------------------
// Single-qubit gates
// ---------------------------------------------------------------------------

#[test]
fn paulis_flip_signs() {
    let q = xz();
    let (x, z) = (var("x"), var("z"));
    assert_eq!(*q.clone().x(), qubit(x.clone(), neg(&z), Sign::Plus));
    assert_eq!(*q.clone().z(), qubit(neg(&x), z.clone(), Sign::Plus));
    assert_eq!(*q.clone().y(), qubit(neg(&x), neg(&z), Sign::Plus));
    assert_eq!(q.clone().y().obs_y(), q.obs_y());
}

#[test]
fn hadamard_swaps_axes_and_negates_y() {
    let q = xz();
    let mut h = q.clone();
    h.h();
    assert_eq!(h.obs_x(), q.obs_z());
    assert_eq!(h.obs_z(), q.obs_x());
    assert_eq!(h.obs_y(), neg(&q.obs_y()));
    assert_eq!(*h.h(), q);
}

#[test]
fn sqrt_gates_move_observables() {
    let q = xz();

    let mut sx = q.clone();
    sx.sqrt_x();
    assert_eq!(sx.obs_x(), q.obs_x());
    assert_eq!(sx.obs_y(), neg(q.obs_z()));
    assert_eq!(sx.obs_z(), &q.obs_y());

    let mut sy = q.clone();
    sy.sqrt_y();
    assert_eq!(sy.obs_x(), q.obs_z());
    assert_eq!(sy.obs_y(), q.obs_y());
    assert_eq!(sy.obs_z(), &neg(q.obs_x()));

    let mut sz = q.clone();
    sz.sqrt_z();
    assert_eq!(sz.obs_x(), &neg(&q.obs_y()));
    assert_eq!(sz.obs_y(), *q.obs_x());
    assert_eq!(sz.obs_z(), q.obs_z());
}

#[test]
fn sqrt_gates_by_state() {
    let q = xz();
    let (x, z) = (var("x"), var("z"));
    assert_eq!(*q.clone().sqrt_x(), qubit(x.clone(), x.times(&z), Sign::Minus));
    assert_eq!(*q.clone().sqrt_y(), qubit(z.clone(), neg(&x), Sign::Minus));
    assert_eq!(*q.clone().sqrt_z(), qubit(neg(&x.times(&z)), z, Sign::Minus));
}

#[test]
fn sqrt_gates_square_to_paulis() {
    let q = xz();
    assert_eq!(*q.clone().sqrt_x().sqrt_x(), *q.clone().x());
    assert_eq!(*q.clone().sqrt_y().sqrt_y(), *q.clone().y());
    assert_eq!(*q.clone().sqrt_z().sqrt_z(), *q.clone().z());
}

#[test]
fn sqrt_gate_group_identities() {
    let q = xz();

    // XYZ = i, XZY = -i: both are the identity on the frame.
    assert_eq!(
        *q.clone().sqrt_x().sqrt_x().sqrt_y().sqrt_y().sqrt_z().sqrt_z(),
        q
    );
    assert_eq!(
        *q.clone().sqrt_x().sqrt_x().sqrt_z().sqrt_z().sqrt_y().sqrt_y(),
        q
    );
    // √Z √Y √X = √Y
    assert_eq!(*q.clone().sqrt_x().sqrt_y().sqrt_z(), *q.clone().sqrt_y());
    // (√Z √Y √X)² = -Y
    assert_eq!(
        *q.clone()
            .sqrt_x()
            .sqrt_y()
            .sqrt_z()
            .sqrt_x()
            .sqrt_y()
            .sqrt_z(),
        *q.clone().sqrt_y().sqrt_y()
    );
    // √X⁻¹ √Z √X = √Y
    assert_eq!(
        *q.clone().sqrt_x().sqrt_z().sqrt_x().sqrt_x().sqrt_x(),
        *q.clone().sqrt_y()
    );
}

// ---------------------------------------------------------------------------
// Two-qubit gates
// ---------------------------------------------------------------------------

fn pair() -> (QubitState, QubitState) {
    (
        qubit(var("x1"), var("z1"), Sign::Plus),
        qubit(var("x2"), var("z2"), Sign::Minus),
    )
}

#[test]
fn cz_by_observable() {
    let (q1, q2) = pair();
    let (mut p1, mut p2) = pair();
    p1.cz(&mut p2);

    assert_eq!(p1.obs_x(), &q1.obs_x().times(q2.obs_z()));
    assert_eq!(p1.obs_y(), q1.obs_y().times(q2.obs_z()));
    assert_eq!(p1.obs_z(), q1.obs_z());
    assert_eq!(p2.obs_x(), &q2.obs_x().times(q1.obs_z()));
    assert_eq!(p2.obs_y(), q2.obs_y().times(q1.obs_z()));
    assert_eq!(p2.obs_z(), q2.obs_z());

    assert_eq!(p1, qubit(var("x1").times(&var("z2")), var("z1"), Sign::Plus));
    assert_eq!(p2, qubit(var("x2").times(&var("z1")), var("z2"), Sign::Minus));
}

#[test]
fn cz_is_symmetric() {
    let (mut a1, mut a2) = pair();
    let (mut b1, mut b2) = pair();
    a1.cz(&mut a2);
    b2.cz(&mut b1);
    assert_eq!((a1, a2), (b1, b2));
}

#[test]
fn cnot_by_observable() {
    let (c, t) = pair();
    let (mut pc, mut pt) = pair();
    pc.cnot(&mut pt);

    assert_eq!(pc.obs_x(), &c.obs_x().times(t.obs_x()));
    assert_eq!(pc.obs_z(), c.obs_z());
    assert_eq!(pt.obs_x(), t.obs_x());
    assert_eq!(pt.obs_z(), &t.obs_z().times(c.obs_z()));
}

#[test]
fn cnot_is_hadamard_conjugated_cz() {
    let (mut a1, mut a2) = pair();
    a1.cnot(&mut a2);

    let (mut b1, mut b2) = pair();
    b2.h();
    b1.cz(&mut b2);
    b2.h();

    assert_eq!((a1, a2), (b1, b2));
}

#[test]
fn xnot_is_hadamard_conjugated_cz() {
    let (mut a1, mut a2) = pair();
    a1.xnot(&mut a2);

    let (mut b1, mut b2) = pair();
    b1.h();
    b2.h();
    b1.cz(&mut b2);
    b1.h();
    b2.h();

    assert_eq!((a1, a2), (b1, b2));
}

#[test]
fn two_qubit_gates_are_involutions() {
    let (q1, q2) = pair();

    let (mut a1, mut a2) = pair();
    a1.cz(&mut a2);
    a1.cz(&mut a2);
    assert_eq!((&a1, &a2), (&q1, &q2));

    a1.cnot(&mut a2);
    a1.cnot(&mut a2);
    assert_eq!((&a1, &a2), (&q1, &q2));

    a1.xnot(&mut a2);
    a1.xnot(&mut a2);
    assert_eq!((&a1, &a2), (&q1, &q2));
}

// ---------------------------------------------------------------------------
// Measurement
// ---------------------------------------------------------------------------

#[test]
fn rewrite_with_measurement_result() {
    let x = ObservableProduct::new(["a", "b"], Sign::Plus);
    let z = ObservableProduct::new(["a", "c"], Sign::Plus);
    let m = MeasurementResult::new(ObservableProduct::new(["b", "d"], Sign::Minus), Sign::Minus)
        .unwrap();
    let mut q = qubit(x, z.clone(), Sign::Minus);
    assert!(q.rewrite_with(&m));
    assert_eq!(q, qubit(ObservableProduct::new(["a", "d"], Sign::Plus), z, Sign::Minus));
    assert!(!q.rewrite_with(&m));
}

#[test]
fn measure_z_random_branch() {
    let x = ObservableProduct::new(["a", "b"], Sign::Plus);
    let z = ObservableProduct::new(["a", "c"], Sign::Plus);
    let q = qubit(x, z.clone(), Sign::Plus);

    let mut oracle = ScriptedOracle::new([Sign::Minus]);
    let collapse = q.measure_z(|| VarId::new("e"), &mut oracle).unwrap();
    assert_eq!(oracle.draws(), 1);
    assert_eq!(collapse.result.measured(), &z);
    assert_eq!(collapse.result.result(), Sign::Minus);
    assert_eq!(collapse.state.obs_z(), &ObservableProduct::constant(Sign::Minus));
    assert_eq!(collapse.state.obs_x(), &var("e"));
    assert_eq!(collapse.state.sign_y(), Sign::Plus);
}

#[test]
fn measure_z_determined_branch_consumes_nothing() {
    let off = qubit(var("x"), ObservableProduct::one(), Sign::Plus);
    let mut oracle = ScriptedOracle::new([Sign::Minus]);
    let mut minted = false;
    let collapse = off
        .measure_z(
            || {
                minted = true;
                VarId::new("f")
            },
            &mut oracle,
        )
        .unwrap();

    assert_eq!(collapse.state, off);
    assert_eq!(collapse.result.result(), Sign::Plus);
    assert_eq!(collapse.result.measured(), &ObservableProduct::one());
    assert_eq!(collapse.result.eliminated_id(), None);
    assert_eq!(oracle.draws(), 0);
    assert!(!minted);
}

#[test]
fn measure_z_of_flipped_qubit_reads_minus() {
    let mut q = QubitState::off(VarId::new("q0"));
    q.x();
    let collapse = q
        .measure_z(|| VarId::new("m0"), &mut ConstantOracle(Sign::Plus))
        .unwrap();
    assert_eq!(collapse.result.result(), Sign::Minus);
    assert!(collapse.result.is_on());
}
