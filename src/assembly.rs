//! Element-local residual and Jacobian assembly.
//!
//! [`LocalAssembler`] evaluates any [`Kernel`] or [`SVBoundaryCondition`]
//! over the quadrature points of one element (or face) and integrates the
//! contributions into a local residual vector and Jacobian block:
//!
//! R_i = Σ_qp w_qp r(ψ_i)
//! J_ij = Σ_qp w_qp ∂r(ψ_i)/∂u_j
//!
//! Nodal values are interpolated with the shape functions supplied at each
//! quadrature point. Global scatter stays with the engine.

use faer::Mat;
use glam::DVec2;

use crate::boundary::{BoundaryContext, SVBoundaryCondition};
use crate::kernels::{Kernel, KernelQp, TrialFunction, Variable};
use crate::state::ConservedState;

/// Shape function data at one quadrature point.
#[derive(Clone, Debug, PartialEq)]
pub struct QuadraturePoint {
    /// Quadrature weight times Jacobian determinant
    pub weight: f64,
    /// Physical position
    pub position: DVec2,
    /// Shape function values φ_j
    pub phi: Vec<f64>,
    /// Shape function gradients ∇φ_j
    pub grad_phi: Vec<DVec2>,
}

impl QuadraturePoint {
    /// Linear shape functions on the segment `[a, b]` with the two-point
    /// Gauss rule.
    pub fn p1_segment(a: f64, b: f64) -> Vec<QuadraturePoint> {
        let length = b - a;
        let half = 0.5 * length;
        let mid = 0.5 * (a + b);
        let grad = DVec2::new(1.0 / length, 0.0);

        [-1.0 / 3.0_f64.sqrt(), 1.0 / 3.0_f64.sqrt()]
            .into_iter()
            .map(|xi| {
                let x = mid + half * xi;
                QuadraturePoint {
                    weight: half,
                    position: DVec2::new(x, 0.0),
                    phi: vec![(b - x) / length, (x - a) / length],
                    grad_phi: vec![-grad, grad],
                }
            })
            .collect()
    }

    /// Linear shape functions on a triangle with the edge-midpoint rule
    /// (exact for quadratics).
    pub fn p1_triangle(vertices: [DVec2; 3]) -> Vec<QuadraturePoint> {
        let [v0, v1, v2] = vertices;
        let e1 = v1 - v0;
        let e2 = v2 - v0;
        let det = e1.perp_dot(e2);
        let area = 0.5 * det.abs();

        let g1 = DVec2::new(e2.y, -e2.x) / det;
        let g2 = DVec2::new(-e1.y, e1.x) / det;
        let g0 = -(g1 + g2);
        let grad_phi = vec![g0, g1, g2];

        [[0.5, 0.5, 0.0], [0.0, 0.5, 0.5], [0.5, 0.0, 0.5]]
            .into_iter()
            .map(|lambda| QuadraturePoint {
                weight: area / 3.0,
                position: lambda[0] * v0 + lambda[1] * v1 + lambda[2] * v2,
                phi: lambda.to_vec(),
                grad_phi: grad_phi.clone(),
            })
            .collect()
    }

    /// Interpolate nodal states at this point.
    pub fn interpolate(&self, nodal: &[ConservedState]) -> ConservedState {
        self.phi
            .iter()
            .zip(nodal)
            .fold(ConservedState::zero(), |acc, (&phi, &u)| acc + u * phi)
    }

    /// Gradient of one unknown at this point.
    pub fn gradient(&self, nodal: &[ConservedState], variable: Variable) -> DVec2 {
        self.grad_phi
            .iter()
            .zip(nodal)
            .fold(DVec2::ZERO, |acc, (&g, u)| acc + variable.value(u) * g)
    }

    /// Gradient of a nodal scalar field at this point.
    pub fn scalar_gradient(&self, nodal: &[f64]) -> DVec2 {
        self.grad_phi
            .iter()
            .zip(nodal)
            .fold(DVec2::ZERO, |acc, (&g, &b)| acc + b * g)
    }
}

/// Shape function data at one face quadrature point.
#[derive(Clone, Debug, PartialEq)]
pub struct FacePoint {
    /// Quadrature weight times face Jacobian
    pub weight: f64,
    /// Outward unit normal
    pub normal: DVec2,
    /// Physical position
    pub position: DVec2,
    /// Values of the element's shape functions on the face
    pub phi: Vec<f64>,
}

/// Nodal data of one element.
#[derive(Clone, Copy, Debug)]
pub struct ElementData<'a> {
    /// Conserved state at each node
    pub nodal: &'a [ConservedState],
    /// Bathymetry at each node, if the field is coupled
    pub bathymetry: Option<&'a [f64]>,
    /// Artificial viscosity at each quadrature point (empty for none)
    pub kappa: &'a [f64],
    /// Whether each node lies on the domain boundary (empty for none)
    pub on_boundary: &'a [bool],
    /// Simulation time
    pub time: f64,
}

impl<'a> ElementData<'a> {
    /// Element with nodal states only.
    pub fn new(nodal: &'a [ConservedState]) -> Self {
        Self {
            nodal,
            bathymetry: None,
            kappa: &[],
            on_boundary: &[],
            time: 0.0,
        }
    }

    /// Attach nodal bathymetry.
    pub fn with_bathymetry(mut self, bathymetry: &'a [f64]) -> Self {
        self.bathymetry = Some(bathymetry);
        self
    }

    /// Attach per-point viscosity.
    pub fn with_kappa(mut self, kappa: &'a [f64]) -> Self {
        self.kappa = kappa;
        self
    }

    /// Attach boundary-node flags.
    pub fn with_boundary_nodes(mut self, on_boundary: &'a [bool]) -> Self {
        self.on_boundary = on_boundary;
        self
    }

    /// Set the simulation time.
    pub fn at_time(mut self, time: f64) -> Self {
        self.time = time;
        self
    }
}

/// Integrates kernels over one element.
#[derive(Clone, Debug)]
pub struct LocalAssembler {
    points: Vec<QuadraturePoint>,
    n_dofs: usize,
}

impl LocalAssembler {
    /// Create an assembler for the given quadrature points.
    ///
    /// The number of shape functions is taken from the first point.
    pub fn new(points: Vec<QuadraturePoint>) -> Self {
        let n_dofs = points.first().map_or(0, |p| p.phi.len());
        debug_assert!(points.iter().all(|p| p.phi.len() == n_dofs && p.grad_phi.len() == n_dofs));
        Self { points, n_dofs }
    }

    /// Number of shape functions per variable.
    pub fn n_dofs(&self) -> usize {
        self.n_dofs
    }

    /// Quadrature points of the element.
    pub fn points(&self) -> &[QuadraturePoint] {
        &self.points
    }

    /// Element volume Σ w_qp.
    pub fn volume(&self) -> f64 {
        self.points.iter().map(|p| p.weight).sum()
    }

    /// Interpolated state at every quadrature point.
    pub fn states(&self, element: &ElementData<'_>) -> Vec<ConservedState> {
        self.points.iter().map(|p| p.interpolate(element.nodal)).collect()
    }

    fn kernel_qp(
        &self,
        kernel: &dyn Kernel,
        element: &ElementData<'_>,
        qp: usize,
        state: ConservedState,
        i: usize,
    ) -> KernelQp {
        let p = &self.points[qp];
        let grad_b = element
            .bathymetry
            .map_or(DVec2::ZERO, |b| p.scalar_gradient(b));
        KernelQp::new(state, p.phi[i], p.grad_phi[i])
            .with_grad_u(p.gradient(element.nodal, kernel.variable()))
            .with_grad_b(grad_b)
            .with_kappa(element.kappa.get(qp).copied().unwrap_or(0.0))
            .on_boundary(element.on_boundary.get(i).copied().unwrap_or(false))
            .at(p.position, element.time)
    }

    /// Local residual vector of one kernel.
    pub fn residual(&self, kernel: &dyn Kernel, element: &ElementData<'_>) -> Vec<f64> {
        let mut r = vec![0.0; self.n_dofs];
        for (qp, p) in self.points.iter().enumerate() {
            let state = p.interpolate(element.nodal);
            for (i, r_i) in r.iter_mut().enumerate() {
                *r_i += p.weight * kernel.residual(&self.kernel_qp(kernel, element, qp, state, i));
            }
        }
        r
    }

    /// Local Jacobian block ∂R(kernel variable)/∂(jvar).
    pub fn jacobian(&self, kernel: &dyn Kernel, element: &ElementData<'_>, jvar: Variable) -> Mat<f64> {
        let n = self.n_dofs;
        let mut jac = Mat::zeros(n, n);
        let diagonal = jvar == kernel.variable();

        for (qp, p) in self.points.iter().enumerate() {
            let state = p.interpolate(element.nodal);
            for i in 0..n {
                let ctx = self.kernel_qp(kernel, element, qp, state, i);
                for j in 0..n {
                    let trial = TrialFunction::new(p.phi[j], p.grad_phi[j]);
                    let value = if diagonal {
                        kernel.jacobian(&ctx, &trial)
                    } else {
                        kernel.off_diag_jacobian(&ctx, &trial, jvar)
                    };
                    jac[(i, j)] += p.weight * value;
                }
            }
        }
        jac
    }

    /// Sum of residuals of several kernels acting on the same variable.
    pub fn residual_sum(&self, kernels: &[&dyn Kernel], element: &ElementData<'_>) -> Vec<f64> {
        let mut total = vec![0.0; self.n_dofs];
        for kernel in kernels {
            for (t, r) in total.iter_mut().zip(self.residual(*kernel, element)) {
                *t += r;
            }
        }
        total
    }

    /// Local residual of a boundary condition over face points.
    pub fn boundary_residual(
        &self,
        bc: &dyn SVBoundaryCondition,
        face: &[FacePoint],
        element: &ElementData<'_>,
    ) -> Vec<f64> {
        let mut r = vec![0.0; self.n_dofs];
        for p in face {
            let state = interpolate_face(&p.phi, element.nodal);
            for (i, r_i) in r.iter_mut().enumerate() {
                let ctx = BoundaryContext::new(state, p.normal, p.phi[i]).at(p.position, element.time);
                *r_i += p.weight * bc.residual(&ctx);
            }
        }
        r
    }

    /// Local Jacobian block of a boundary condition w.r.t. `jvar`.
    pub fn boundary_jacobian(
        &self,
        bc: &dyn SVBoundaryCondition,
        face: &[FacePoint],
        element: &ElementData<'_>,
        jvar: Variable,
    ) -> Mat<f64> {
        let n = self.n_dofs;
        let mut jac = Mat::zeros(n, n);
        let diagonal = jvar == bc.variable();

        for p in face {
            let state = interpolate_face(&p.phi, element.nodal);
            for i in 0..n {
                let ctx = BoundaryContext::new(state, p.normal, p.phi[i]).at(p.position, element.time);
                for j in 0..n {
                    let trial = TrialFunction::new(p.phi[j], DVec2::ZERO);
                    let value = if diagonal {
                        bc.jacobian(&ctx, &trial)
                    } else {
                        bc.off_diag_jacobian(&ctx, &trial, jvar)
                    };
                    jac[(i, j)] += p.weight * value;
                }
            }
        }
        jac
    }
}

fn interpolate_face(phi: &[f64], nodal: &[ConservedState]) -> ConservedState {
    phi.iter()
        .zip(nodal)
        .fold(ConservedState::zero(), |acc, (&phi, &u)| acc + u * phi)
}
