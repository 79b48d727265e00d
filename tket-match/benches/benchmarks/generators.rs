use tket_match::circuit::build_simple_circuit;
use tket_match::{Circuit, TketOp};

/// Create a circuit with layers of CNOTs.
///
/// - In each odd layer, we apply CNOTs between qubits `2i` and `2i+1` for each possible `i`.
/// - In each even layer, we apply CNOTs between qubits `2i+1` and `2i+2` for each possible `i`.
///
/// For example, for 4 qubits and 5 layers, we get the following circuit:
/// ```text
/// --*-----*-----*--
///   |     |     |
/// --x--*--x--*--x--
///      |     |
/// --*--x--*--x--*--
///   |     |     |
/// --x-----x-----x--
/// ```
pub fn make_cnot_layers(num_qubits: usize, layers: usize) -> Circuit {
    build_simple_circuit(num_qubits, |circ| {
        for layer in 0..layers {
            let start = layer % 2;
            let cnot_count = (num_qubits - start) / 2;
            for i in 0..cnot_count {
                let q = i * 2 + start;
                circ.append(TketOp::CX, [q, q + 1])?;
            }
        }
        Ok(())
    })
    .unwrap()
}

/// Create a circuit of repeated `CX Rz CX` sandwiches on neighbouring qubits.
pub fn make_zz_sandwiches(num_qubits: usize, layers: usize) -> Circuit {
    build_simple_circuit(num_qubits, |circ| {
        for layer in 0..layers {
            let angle = 0.1 * (layer + 1) as f64;
            for q in 0..num_qubits - 1 {
                circ.append(TketOp::CX, [q, q + 1])?;
                circ.append_with_params(TketOp::Rz, [q + 1], [angle])?;
                circ.append(TketOp::CX, [q, q + 1])?;
            }
        }
        Ok(())
    })
    .unwrap()
}
