//! Finite-difference checks of the kernel and boundary Jacobians.
//!
//! Each analytic Jacobian block assembled on one element is compared to a
//! central difference of the assembled residual with respect to every nodal
//! value of every unknown.

use glam::DVec2;
use sv_rs::assembly::{ElementData, FacePoint, LocalAssembler, QuadraturePoint};
use sv_rs::boundary::{SVBoundaryCondition, SolidWallBC, SolidWallConfig};
use sv_rs::kernels::{
    BathymetrySource, GaussianBump, Kernel, SVAdvection, SVArtificialViscosity, SVBathymetry,
    SVContinuity, SVPressure, Variable,
};
use sv_rs::{Component, ConservedState, CoupledFields, FieldName, MeshDimension};

const G: f64 = 9.80665;
const EPS: f64 = 1e-6;
const TOL: f64 = 1e-6;

const VARIABLES: [Variable; 3] = [Variable::H, Variable::QX, Variable::QY];

fn triangle() -> [DVec2; 3] {
    [DVec2::new(0.1, 0.0), DVec2::new(1.2, 0.3), DVec2::new(0.4, 0.9)]
}

fn nodal_states() -> Vec<ConservedState> {
    vec![
        ConservedState::new(1.0, 0.3, 0.1),
        ConservedState::new(1.3, -0.2, 0.4),
        ConservedState::new(0.8, 0.5, -0.3),
    ]
}

fn perturb(nodal: &[ConservedState], node: usize, variable: Variable, delta: f64) -> Vec<ConservedState> {
    let mut out = nodal.to_vec();
    match variable {
        Variable::H => out[node].h += delta,
        Variable::QX => out[node].q_x += delta,
        Variable::QY => out[node].q_y += delta,
    }
    out
}

fn check_kernel(kernel: &dyn Kernel, assembler: &LocalAssembler, bathymetry: &[f64], kappa: &[f64]) {
    let nodal = nodal_states();
    let n = assembler.n_dofs();

    for jvar in VARIABLES {
        let element = ElementData::new(&nodal)
            .with_bathymetry(bathymetry)
            .with_kappa(kappa);
        let jac = assembler.jacobian(kernel, &element, jvar);

        for j in 0..n {
            let plus = perturb(&nodal, j, jvar, EPS);
            let minus = perturb(&nodal, j, jvar, -EPS);
            let r_plus = assembler.residual(
                kernel,
                &ElementData::new(&plus).with_bathymetry(bathymetry).with_kappa(kappa),
            );
            let r_minus = assembler.residual(
                kernel,
                &ElementData::new(&minus).with_bathymetry(bathymetry).with_kappa(kappa),
            );

            for i in 0..n {
                let fd = (r_plus[i] - r_minus[i]) / (2.0 * EPS);
                assert!(
                    (jac[(i, j)] - fd).abs() < TOL,
                    "{}: dR_{}/d{:?}_{} analytic {} vs finite difference {}",
                    kernel.name(),
                    i,
                    jvar,
                    j,
                    jac[(i, j)],
                    fd
                );
            }
        }
    }
}

#[test]
fn test_flux_kernel_jacobians_2d() {
    let assembler = LocalAssembler::new(QuadraturePoint::p1_triangle(triangle()));
    let dim = MeshDimension::Two;
    let fields = CoupledFields::conserved(dim).with(FieldName::B);
    let bathymetry = [0.0, 0.1, -0.05];
    let kappa = [0.02, 0.03, 0.01];

    let kernels: Vec<Box<dyn Kernel>> = vec![
        Box::new(SVContinuity::new(dim, &fields).unwrap()),
        Box::new(SVAdvection::new(Component::X, dim, &fields).unwrap()),
        Box::new(SVAdvection::new(Component::Y, dim, &fields).unwrap()),
        Box::new(SVPressure::new(Component::X, G, dim).unwrap()),
        Box::new(SVPressure::new(Component::Y, G, dim).unwrap()),
        Box::new(
            SVBathymetry::new(Component::X, G, BathymetrySource::Coupled, dim, &fields).unwrap(),
        ),
        Box::new(
            SVBathymetry::new(
                Component::Y,
                G,
                BathymetrySource::function(GaussianBump::new(0.2, DVec2::new(0.5, 0.4), 0.3)),
                dim,
                &fields,
            )
            .unwrap(),
        ),
        Box::new(SVArtificialViscosity::new(Variable::H)),
        Box::new(SVArtificialViscosity::new(Variable::QY)),
    ];

    for kernel in &kernels {
        check_kernel(kernel.as_ref(), &assembler, &bathymetry, &kappa);
    }
}

#[test]
fn test_advection_jacobian_1d_ignores_q_y() {
    let assembler = LocalAssembler::new(QuadraturePoint::p1_segment(0.0, 0.5));
    let dim = MeshDimension::One;
    let fields = CoupledFields::conserved(dim);
    let kernel = SVAdvection::new(Component::X, dim, &fields).unwrap();

    let nodal = vec![ConservedState::new_1d(1.0, 0.4), ConservedState::new_1d(1.5, -0.1)];
    let element = ElementData::new(&nodal);

    let jac = assembler.jacobian(&kernel, &element, Variable::QY);
    for i in 0..2 {
        for j in 0..2 {
            assert_eq!(jac[(i, j)], 0.0);
        }
    }

    let jac = assembler.jacobian(&kernel, &element, Variable::QX);
    let plus = vec![ConservedState::new_1d(1.0, 0.4 + EPS), nodal[1]];
    let minus = vec![ConservedState::new_1d(1.0, 0.4 - EPS), nodal[1]];
    let r_plus = assembler.residual(&kernel, &ElementData::new(&plus));
    let r_minus = assembler.residual(&kernel, &ElementData::new(&minus));
    for i in 0..2 {
        let fd = (r_plus[i] - r_minus[i]) / (2.0 * EPS);
        assert!((jac[(i, 0)] - fd).abs() < TOL);
    }
}

#[test]
fn test_viscosity_jacobian_skips_boundary_nodes() {
    let assembler = LocalAssembler::new(QuadraturePoint::p1_triangle(triangle()));
    let kernel = SVArtificialViscosity::new(Variable::H);
    let nodal = nodal_states();
    let kappa = [0.1; 3];
    let on_boundary = [true, false, false];
    let element = ElementData::new(&nodal)
        .with_kappa(&kappa)
        .with_boundary_nodes(&on_boundary);

    let r = assembler.residual(&kernel, &element);
    let jac = assembler.jacobian(&kernel, &element, Variable::H);
    assert_eq!(r[0], 0.0);
    for j in 0..3 {
        assert_eq!(jac[(0, j)], 0.0);
    }
    assert!(jac[(1, 1)] > 0.0);
}

#[test]
fn test_solid_wall_jacobian() {
    let assembler = LocalAssembler::new(QuadraturePoint::p1_triangle(triangle()));
    let fields = CoupledFields::conserved(MeshDimension::Two);
    let bc = SolidWallBC::new(SolidWallConfig::momentum(Component::Y), MeshDimension::Two, &fields)
        .unwrap();

    // Face between vertices 0 and 1, two-point Gauss
    let [v0, v1, _] = triangle();
    let edge = v1 - v0;
    let normal = DVec2::new(edge.y, -edge.x).normalize();
    let half = 0.5 * edge.length();
    let face: Vec<FacePoint> = [-1.0 / 3.0_f64.sqrt(), 1.0 / 3.0_f64.sqrt()]
        .into_iter()
        .map(|xi| {
            let s = 0.5 * (1.0 + xi);
            FacePoint {
                weight: half,
                normal,
                position: v0 + s * edge,
                phi: vec![1.0 - s, s, 0.0],
            }
        })
        .collect();

    let nodal = nodal_states();
    let jac = assembler.boundary_jacobian(&bc, &face, &ElementData::new(&nodal), Variable::H);

    for j in 0..3 {
        let plus = perturb(&nodal, j, Variable::H, EPS);
        let minus = perturb(&nodal, j, Variable::H, -EPS);
        let r_plus = assembler.boundary_residual(&bc, &face, &ElementData::new(&plus));
        let r_minus = assembler.boundary_residual(&bc, &face, &ElementData::new(&minus));
        for i in 0..3 {
            let fd = (r_plus[i] - r_minus[i]) / (2.0 * EPS);
            assert!((jac[(i, j)] - fd).abs() < TOL, "{} dR_{i}/dh_{j}", bc.name());
        }
    }

    // Third vertex is off the face
    assert_eq!(jac[(2, 2)], 0.0);
}
