/// Instructions sent alongside the rate-card image. The segment names it asks
/// for are the ones the rule table knows about.
pub const EXTRACTION_PROMPT: &str = r#"You are extracting insurance policy data from an image. Return a JSON array whose objects have exactly these keys: segment, policy_type, location, payin, remark.

1. Identify the vehicle category of each row:
   - 2W, MC, MCY, SC, Scooter, EV -> two wheeler
   - PVT CAR, Car, PCI, 4W -> private car
   - CV, GVW, PCV, GCV, tonnage, 3W auto -> commercial vehicle
   - Bus -> bus
   - Taxi -> taxi
   - Tractor, Ambulance, Misd -> miscellaneous

2. Identify the policy type from the column headers:
   - a 1+1 column means Comp
   - a SATP column means TP
   - when both columns exist, emit two separate records

3. Map every row to one of these exact segment names:
   - two wheeler: "TW SAOD + COMP" for 1+1/Comp/SAOD, "TW TP" for SATP/TP, "1+5" for new/fresh policies
   - private car: "PVT CAR COMP + SAOD" for 1+1/Comp/SAOD, "PVT CAR TP" for SATP/TP
   - commercial vehicle: always "All GVW & PCV 3W, GCV 3W"
   - bus: "SCHOOL BUS" for school buses, otherwise "STAFF BUS"
   - taxi: "TAXI"
   - miscellaneous: "Misd, Tractor"
   Never use raw labels such as "2W", "MC" or "Scooter" as the segment.

4. Fill the remaining fields:
   - policy_type: "Comp" or "TP"
   - location: the cluster, state or agency name
   - payin: the CD2 value (ignore CD1) as a plain number, e.g. 63.0 rather than "63.0%". If no CD2 column exists, use whichever column carries the pay rate (PO, payrate, or a percentage between 0 and 100). Report negative percentages as positive.
   - remark: any qualifier for the row as a string (make, vehicle age, seating capacity, contract type)

5. When one cell lists several rates, emit one record per rate and name the qualifier in the remark. For "Tata 30%; any other makes: 28%/26%" emit 30 with remark "Tata" and 26 (the lowest) with remark "other make". For age slabs such as "upto 2 years: 69%, above 2 years: 70%" emit one record per slab with the slab as the remark.

6. Tables with one rate column per contract type (school bus, on contract transporter, on contract individual) produce one record per column per location.

Return ONLY the JSON array, with no markdown."#;
