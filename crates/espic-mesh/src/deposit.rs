//! Linear (cloud-in-cell) charge deposition.

use crate::error::MeshError;
use crate::mesh::Mesh;
use crate::periodic::primary_interval;
use espic_core::{ChargeContribution, ChargeSource, InvariantError, CHARGE_TOLERANCE};

impl Mesh {
    /// Rebuild `charge_density` from a set of charge sources.
    ///
    /// Resets the density to zero, then deposits every source:
    ///
    /// - **Particles**: each particle at `x` with charge `c = q * w` is
    ///   split between the nodes of its primary interval `[mesh[i], mesh[i+1])`:
    ///
    ///   ```text
    ///   left  += c * (mesh[i+1] - x) / dx
    ///   right += c * (x - mesh[i])   / dx
    ///   ```
    ///
    ///   A particle exactly on a node puts all of its charge there.
    /// - **Background**: the density is added to every node.
    ///
    /// Charge landing on the duplicated endpoint (x = 1) is accumulated on
    /// index 0, and the endpoint is copied from index 0 afterwards.
    ///
    /// # Errors
    ///
    /// - [`MeshError::SourceLengthMismatch`] if a particle source has
    ///   different numbers of positions and weights.
    /// - [`MeshError::Invariant`] with
    ///   [`InvariantError::ChargeNotConserved`] if the charge on the
    ///   distinct nodes differs from the injected charge (this includes
    ///   NaN or infinite particle data).
    ///
    /// # Examples
    ///
    /// ```
    /// use espic_core::{ChargeContribution, ChargeSource};
    /// use espic_mesh::Mesh;
    ///
    /// struct One;
    /// impl ChargeSource for One {
    ///     fn charge_contribution(&self) -> ChargeContribution<'_> {
    ///         ChargeContribution::Particles {
    ///             charge: 1.0,
    ///             positions: &[0.05],
    ///             weights: &[1.0],
    ///         }
    ///     }
    /// }
    ///
    /// let mut mesh = Mesh::builder().intervals(10).build().unwrap();
    /// mesh.deposit([&One]).unwrap();
    /// assert!((mesh.charge_density()[0] - 0.5).abs() < 1e-12);
    /// assert!((mesh.charge_density()[1] - 0.5).abs() < 1e-12);
    /// assert_eq!(mesh.charge_density()[0], mesh.charge_density()[10]);
    /// ```
    pub fn deposit<'s, S, I>(&mut self, sources: I) -> Result<(), MeshError>
    where
        S: ChargeSource + ?Sized + 's,
        I: IntoIterator<Item = &'s S>,
    {
        let nintervals = self.nintervals();
        self.charge_density.fill(0.0);
        let mut injected = 0.0;
        let mut magnitude = 0.0;

        for source in sources {
            match source.charge_contribution() {
                ChargeContribution::Particles {
                    charge,
                    positions,
                    weights,
                } => {
                    if positions.len() != weights.len() {
                        return Err(MeshError::SourceLengthMismatch {
                            positions: positions.len(),
                            weights: weights.len(),
                        });
                    }
                    for (&x, &w) in positions.iter().zip(weights) {
                        let c = charge * w;
                        self.deposit_particle(x, c);
                        injected += c;
                        magnitude += c.abs();
                    }
                }
                ChargeContribution::Background { density } => {
                    for rho in &mut self.charge_density[..nintervals] {
                        *rho += density;
                    }
                    let total = density * nintervals as f64;
                    injected += total;
                    magnitude += total.abs();
                }
            }
        }

        Mesh::sync_boundary(&mut self.charge_density);
        self.check_conservation(injected, magnitude)
    }

    /// Deposit a single charge `c` at `x` onto the distinct nodes.
    fn deposit_particle(&mut self, x: f64, c: f64) {
        let nintervals = self.nintervals();
        let dx = self.dx();
        let i = primary_interval(x, self.mesh(), dx);
        let left_pos = self.mesh()[i];
        let right_pos = self.mesh()[i + 1];

        if x == left_pos {
            self.charge_density[i] += c;
            return;
        }

        // The right node of the last interval is the duplicated endpoint.
        let right = (i + 1) % nintervals;
        self.charge_density[i] += c * (right_pos - x) / dx;
        self.charge_density[right] += c * (x - left_pos) / dx;
    }

    /// Total charge on the non-duplicated nodes `[0, nmesh - 2]`.
    pub fn total_charge(&self) -> f64 {
        self.charge_density[..self.nintervals()].iter().sum()
    }

    fn check_conservation(&self, injected: f64, magnitude: f64) -> Result<(), MeshError> {
        let deposited = self.total_charge();
        let tolerance = CHARGE_TOLERANCE * magnitude.max(1.0);
        // Written as a negated `<=` so NaN fails the check.
        if !((deposited - injected).abs() <= tolerance) {
            return Err(InvariantError::ChargeNotConserved {
                deposited,
                injected,
            }
            .into());
        }
        Ok(())
    }
}
